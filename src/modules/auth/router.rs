use axum::{Router, middleware, routing::post};

use crate::middleware::auth::verify_token;
use crate::middleware::role::{authorize, require_role};
use crate::state::AppState;

use super::controller::create_user;

/// Routes under `/auth`. Layers run bottom-up: token verification, then the
/// role gate, then the handler.
pub fn init_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/user", post(create_user))
        .route_layer(middleware::from_fn_with_state(
            require_role(["admin"]),
            authorize,
        ))
        .route_layer(middleware::from_fn_with_state(state, verify_token))
}
