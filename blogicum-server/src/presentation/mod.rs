use std::sync::Arc;

use sqlx::PgPool;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::comment_service::CommentService;
use crate::application::profile_service::ProfileService;
use crate::data::repositories::postgres::category_repository::PostgresCategoryRepository;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

pub(crate) type PgAuthService = AuthService<PostgresUserRepository>;
pub(crate) type PgBlogService =
    BlogService<PostgresPostRepository, PostgresCategoryRepository, PostgresCommentRepository>;
pub(crate) type PgCommentService = CommentService<PostgresCommentRepository, PostgresPostRepository>;
pub(crate) type PgProfileService = ProfileService<PostgresUserRepository, PostgresPostRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<PgAuthService>,
    pub(crate) blog_service: Arc<PgBlogService>,
    pub(crate) comment_service: Arc<PgCommentService>,
    pub(crate) profile_service: Arc<PgProfileService>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn from_pool(pool: PgPool, jwt: JwtService) -> Self {
        let users = PostgresUserRepository::new(pool.clone());
        let posts = PostgresPostRepository::new(pool.clone());
        let categories = PostgresCategoryRepository::new(pool.clone());
        let comments = PostgresCommentRepository::new(pool);

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), jwt.clone())),
            blog_service: Arc::new(BlogService::new(
                posts.clone(),
                categories,
                comments.clone(),
            )),
            comment_service: Arc::new(CommentService::new(comments, posts.clone())),
            profile_service: Arc::new(ProfileService::new(users, posts)),
            jwt: Arc::new(jwt),
        }
    }
}
