use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::dto::{CommentDto, PageQuery, PostDto, PostPageDto};
use crate::application::blog_service::PostDetail;
use crate::domain::post::{CreatePostRequest, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, post_detail_location};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

fn default_published() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 256))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) text: String,
    /// Defaults to the moment of creation; a future date schedules the post.
    pub(crate) pub_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1))]
    pub(crate) category_id: Option<i64>,
    #[serde(default = "default_published")]
    pub(crate) is_published: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 256))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub(crate) category_id: Option<i64>,
    #[serde(default = "default_published")]
    pub(crate) is_published: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    pub(crate) post: PostDto,
    pub(crate) comments: Vec<CommentDto>,
}

impl From<PostDetail> for PostDetailDto {
    fn from(detail: PostDetail) -> Self {
        Self {
            post: detail.post.into(),
            comments: detail.comments.into_iter().map(CommentDto::from).collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(PageQuery),
    responses(
        (status = 200, description = "Published posts, newest first", body = PostPageDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PostPageDto>> {
    let page = state.blog_service.index(query.raw()).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        (),
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post with its comments", body = PostDetailDto),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "Post not found or not visible"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn post_detail(
    State(state): State<AppState>,
    viewer: Option<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDetailDto>> {
    let viewer_id = viewer.map(|user| user.user_id);
    let detail = state.blog_service.post_detail(viewer_id, id).await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    post,
    path = "/api/posts/create",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created, `Location` points at its detail page", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<PostDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        text: dto.text,
        pub_date: dto.pub_date,
        category_id: dto.category_id,
        is_published: dto.is_published,
    };

    let post = state.blog_service.create_post(auth.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, post_detail_location(post.id))],
        Json(post.into()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/edit",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Current post data", body = PostDto),
        (status = 303, description = "Not the author, see the post instead"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_post_form(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDto>> {
    let post = state.blog_service.post_for_edit(auth.user_id, id).await?;
    Ok(Json(post.into()))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/edit",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 303, description = "Not the author, see the post instead"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<Json<PostDto>> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        text: dto.text,
        pub_date: dto.pub_date,
        category_id: dto.category_id,
        is_published: dto.is_published,
    };

    let post = state
        .blog_service
        .update_post(auth.user_id, id, req)
        .await?;
    Ok(Json(post.into()))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/delete",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post pending deletion", body = PostDto),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post_form(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDto>> {
    let post = state.blog_service.post_for_delete(auth.user_id, id).await?;
    Ok(Json(post.into()))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/delete",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.blog_service.delete_post(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
