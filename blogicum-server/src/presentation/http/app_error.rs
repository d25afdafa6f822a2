use crate::domain::error::DomainError;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

pub(crate) fn post_detail_location(post_id: i64) -> String {
    format!("/api/posts/{post_id}")
}

pub(crate) fn profile_location(username: &str) -> String {
    format!("/api/profile/{username}")
}

fn redirect_to_post(post_id: i64, message: String) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, post_detail_location(post_id))],
        Json(ErrorBody { error: message }),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::Domain(err) => match &err {
                DomainError::NotAuthor { post_id } => {
                    return redirect_to_post(*post_id, err.to_string());
                }
                DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                DomainError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
                DomainError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                DomainError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
                DomainError::Unexpected(_) => {
                    error!(error = %err, "request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    )
                }
            },
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            AppError::Internal(err) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: msg })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;

    use super::AppError;
    use crate::domain::error::DomainError;

    #[test]
    fn not_author_redirects_to_post_detail() {
        let response = AppError::from(DomainError::NotAuthor { post_id: 12 }).into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok());
        assert_eq!(location, Some("/api/posts/12"));
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (DomainError::NotFound("post".into()), StatusCode::NOT_FOUND),
            (
                DomainError::AlreadyExists("username".into()),
                StatusCode::CONFLICT,
            ),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                DomainError::Validation {
                    field: "title",
                    message: "must be 1..256 chars",
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Unexpected("db down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }
}
