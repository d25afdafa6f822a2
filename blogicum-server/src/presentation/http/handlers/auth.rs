use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::dto::UserDto;
use crate::application::auth_service::AuthResult;
use crate::domain::user::{LoginRequest, RegisterRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, profile_location};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterDto {
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub(crate) first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub(crate) last_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) username: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthResponseDto {
    pub(crate) access_token: String,
    pub(crate) user: UserDto,
}

impl From<RegisterDto> for RegisterRequest {
    fn from(dto: RegisterDto) -> Self {
        Self {
            username: dto.username,
            email: dto.email,
            password: dto.password,
            first_name: dto.first_name,
            last_name: dto.last_name,
        }
    }
}

impl From<LoginDto> for LoginRequest {
    fn from(dto: LoginDto) -> Self {
        Self {
            username: dto.username,
            password: dto.password,
        }
    }
}

impl From<AuthResult> for AuthResponseDto {
    fn from(result: AuthResult) -> Self {
        Self {
            access_token: result.access_token,
            user: result.user.into(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Registered, `Location` points at the new profile", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterDto>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<AuthResponseDto>)> {
    dto.validate()?;

    let result = state.auth_service.register(dto.into()).await?;
    let location = profile_location(&result.user.username);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(result.into()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<Json<AuthResponseDto>> {
    dto.validate()?;

    let result = state.auth_service.login(dto.into()).await?;
    Ok(Json(result.into()))
}
