use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::presentation::AppState;
use crate::presentation::http::handlers::comments::{
    add_comment, delete_comment, delete_comment_form, edit_comment, edit_comment_form,
};
use crate::presentation::http::handlers::posts::{
    create_post, delete_post, delete_post_form, edit_post, edit_post_form, index, post_detail,
};
use crate::presentation::http::middleware::auth::{
    jwt_auth_middleware, optional_jwt_auth_middleware,
};

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/", get(index));

    let viewer_aware = Router::new()
        .route("/{id}", get(post_detail))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_jwt_auth_middleware,
        ));

    let protected = Router::new()
        .route("/create", post(create_post))
        .route("/{id}/edit", get(edit_post_form).post(edit_post))
        .route("/{id}/delete", get(delete_post_form).post(delete_post))
        .route("/{id}/comment", post(add_comment))
        .route(
            "/{id}/edit_comment/{comment_id}",
            get(edit_comment_form).post(edit_comment),
        )
        .route(
            "/{id}/delete_comment/{comment_id}",
            get(delete_comment_form).post(delete_comment),
        )
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(viewer_aware).merge(protected)
}
