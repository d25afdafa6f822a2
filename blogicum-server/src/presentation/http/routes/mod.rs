use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::categories::{category_posts, list_categories};

pub(crate) mod auth;
pub(crate) mod posts;
pub(crate) mod profile;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health))
        .nest("/api/auth", auth::router())
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/profile", profile::router(state))
        .route("/api/category/{slug}", get(category_posts))
        .route("/api/categories", get(list_categories))
}

async fn health() -> &'static str {
    "ok"
}
