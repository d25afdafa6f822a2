use std::time::Duration;

use anyhow::anyhow;
use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

use crate::infrastructure::settings::Settings;
use crate::presentation::http::app_error::AppError;

pub(crate) fn apply_limits(router: Router, settings: &Settings) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(settings.http_request_timeout_secs))
                .concurrency_limit(settings.http_concurrency_limit),
        )
        .layer(RequestBodyLimitLayer::new(
            settings.http_request_body_limit_bytes,
        ))
}

async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        return (StatusCode::REQUEST_TIMEOUT, "request timed out").into_response();
    }
    AppError::Internal(anyhow!("unhandled middleware error: {err}")).into_response()
}
