use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::dto::CommentDto;
use crate::domain::comment::CommentRequest;
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, post_detail_location};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CommentFormDto {
    #[validate(length(min = 1, max = 10_000))]
    pub(crate) text: String,
}

impl From<CommentFormDto> for CommentRequest {
    fn from(dto: CommentFormDto) -> Self {
        Self { text: dto.text }
    }
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comment",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = CommentFormDto,
    responses(
        (status = 201, description = "Comment added, `Location` points at the post", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(post_id): Path<i64>,
    Json(dto): Json<CommentFormDto>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<CommentDto>)> {
    dto.validate()?;
    let comment = state
        .comment_service
        .add_comment(auth.user_id, post_id, dto.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, post_detail_location(post_id))],
        Json(comment.into()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/edit_comment/{comment_id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Current comment", body = CommentDto),
        (status = 303, description = "Not the author, see the post instead"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_comment_form(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<Json<CommentDto>> {
    let comment = state
        .comment_service
        .own_comment(auth.user_id, post_id, comment_id)
        .await?;
    Ok(Json(comment.into()))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/edit_comment/{comment_id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    request_body = CommentFormDto,
    responses(
        (status = 200, description = "Comment updated", body = CommentDto),
        (status = 303, description = "Not the author, see the post instead"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    Json(dto): Json<CommentFormDto>,
) -> AppResult<Json<CommentDto>> {
    dto.validate()?;
    let comment = state
        .comment_service
        .edit_comment(auth.user_id, post_id, comment_id, dto.into())
        .await?;
    Ok(Json(comment.into()))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/delete_comment/{comment_id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment pending deletion", body = CommentDto),
        (status = 303, description = "Not the author, see the post instead"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment_form(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<Json<CommentDto>> {
    let comment = state
        .comment_service
        .own_comment(auth.user_id, post_id, comment_id)
        .await?;
    Ok(Json(comment.into()))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/delete_comment/{comment_id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 303, description = "Not the author, see the post instead"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    state
        .comment_service
        .delete_comment(auth.user_id, post_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
