use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use utoipa::ToSchema;

use super::dto::{CategoryDto, PageQuery, PostPageDto};
use crate::application::blog_service::CategoryPosts;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryPostsDto {
    pub(crate) category: CategoryDto,
    pub(crate) posts: PostPageDto,
}

impl From<CategoryPosts> for CategoryPostsDto {
    fn from(value: CategoryPosts) -> Self {
        Self {
            category: value.category.into(),
            posts: value.page.into(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/category/{slug}",
    tag = "categories",
    params(
        ("slug" = String, Path, description = "Category slug"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Category with its published posts", body = CategoryPostsDto),
        (status = 404, description = "Category missing or unpublished"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn category_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CategoryPostsDto>> {
    let result = state
        .blog_service
        .category_posts(&slug, query.raw())
        .await?;
    Ok(Json(result.into()))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Published categories", body = [CategoryDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryDto>>> {
    let categories = state.blog_service.published_categories().await?;
    Ok(Json(categories.into_iter().map(CategoryDto::from).collect()))
}
