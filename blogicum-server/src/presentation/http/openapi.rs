use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::auth::{AuthResponseDto, LoginDto, RegisterDto};
use crate::presentation::http::handlers::categories::CategoryPostsDto;
use crate::presentation::http::handlers::comments::CommentFormDto;
use crate::presentation::http::handlers::dto::{
    CategoryDto, CommentDto, PostCategoryDto, PostDto, PostPageDto, PublicUserDto, UserDto,
};
use crate::presentation::http::handlers::posts::{CreatePostDto, PostDetailDto, UpdatePostDto};
use crate::presentation::http::handlers::profile::{ProfileDto, UpdateProfileDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::auth::register,
        crate::presentation::http::handlers::auth::login,
        crate::presentation::http::handlers::posts::index,
        crate::presentation::http::handlers::posts::post_detail,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::edit_post_form,
        crate::presentation::http::handlers::posts::edit_post,
        crate::presentation::http::handlers::posts::delete_post_form,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::categories::category_posts,
        crate::presentation::http::handlers::categories::list_categories,
        crate::presentation::http::handlers::comments::add_comment,
        crate::presentation::http::handlers::comments::edit_comment_form,
        crate::presentation::http::handlers::comments::edit_comment,
        crate::presentation::http::handlers::comments::delete_comment_form,
        crate::presentation::http::handlers::comments::delete_comment,
        crate::presentation::http::handlers::profile::profile,
        crate::presentation::http::handlers::profile::edit_profile_form,
        crate::presentation::http::handlers::profile::edit_profile
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            PublicUserDto,
            CreatePostDto,
            UpdatePostDto,
            PostDto,
            PostCategoryDto,
            PostPageDto,
            PostDetailDto,
            CategoryDto,
            CategoryPostsDto,
            CommentDto,
            CommentFormDto,
            ProfileDto,
            UpdateProfileDto
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "posts", description = "Publications"),
        (name = "categories", description = "Category listings"),
        (name = "comments", description = "Comments under publications"),
        (name = "profile", description = "User profiles")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
