use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

use super::dto::{PageQuery, PostPageDto, PublicUserDto, UserDto};
use crate::application::profile_service::ProfilePage;
use crate::domain::user::UpdateProfileRequest;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfileDto {
    pub(crate) user: PublicUserDto,
    pub(crate) is_owner: bool,
    pub(crate) posts: PostPageDto,
}

impl From<ProfilePage> for ProfileDto {
    fn from(value: ProfilePage) -> Self {
        Self {
            user: value.user.into(),
            is_owner: value.is_owner,
            posts: value.page.into(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdateProfileDto {
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub(crate) first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub(crate) last_name: String,
}

#[utoipa::path(
    get,
    path = "/api/profile/{username}",
    tag = "profile",
    security(
        (),
        ("bearer_auth" = [])
    ),
    params(
        ("username" = String, Path, description = "Profile owner"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Profile with the owner's posts", body = ProfileDto),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn profile(
    State(state): State<AppState>,
    viewer: Option<AuthenticatedUser>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ProfileDto>> {
    let viewer_id = viewer.map(|user| user.user_id);
    let page = state
        .profile_service
        .profile(viewer_id, &username, query.raw())
        .await?;
    Ok(Json(page.into()))
}

// The path segment is informational: the requester always edits themselves.
#[utoipa::path(
    get,
    path = "/api/profile/{username}/edit",
    tag = "profile",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("username" = String, Path, description = "Ignored, the requester's profile is returned")
    ),
    responses(
        (status = 200, description = "Requester's profile", body = UserDto),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_profile_form(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(_username): Path<String>,
) -> AppResult<Json<UserDto>> {
    let user = state.profile_service.own_profile(auth.user_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/profile/{username}/edit",
    tag = "profile",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("username" = String, Path, description = "Ignored, the requester's profile is updated")
    ),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username or email taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(username): Path<String>,
    Json(dto): Json<UpdateProfileDto>,
) -> AppResult<Json<UserDto>> {
    dto.validate()?;
    if username != auth.username {
        debug!(path = %username, actor = %auth.username, "editing own profile via another username");
    }
    let req = UpdateProfileRequest {
        username: dto.username,
        email: dto.email,
        first_name: dto.first_name,
        last_name: dto.last_name,
    };

    let user = state
        .profile_service
        .update_profile(auth.user_id, req)
        .await?;
    Ok(Json(user.into()))
}
