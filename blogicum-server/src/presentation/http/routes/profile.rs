use axum::{Router, middleware, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::profile::{edit_profile, edit_profile_form, profile};
use crate::presentation::http::middleware::auth::{
    jwt_auth_middleware, optional_jwt_auth_middleware,
};

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let viewer_aware = Router::new()
        .route("/{username}", get(profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_jwt_auth_middleware,
        ));

    let protected = Router::new()
        .route(
            "/{username}/edit",
            get(edit_profile_form).post(edit_profile),
        )
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    viewer_aware.merge(protected)
}
