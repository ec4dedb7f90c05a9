use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;

use crate::logging::logging_middleware;
use crate::middleware::error::{handle_errors, handle_panic, not_found};
use crate::middleware::security::{apply_security_headers, cors_layer, enforce_origin};
use crate::modules::auth::init_auth_router;
use crate::modules::docs::init_docs_router;
use crate::modules::system::init_system_router;
use crate::state::AppState;

/// Builds the application router.
///
/// Outermost first: security headers, request logging, the terminal error
/// handler, the origin check, CORS, panic conversion, then the routes.
pub fn init_router(state: AppState) -> Router {
    let env = state.env;

    let router = Router::new()
        .merge(init_system_router())
        .merge(init_docs_router())
        .nest("/auth", init_auth_router(state.clone()))
        .fallback(not_found)
        .with_state(state.clone())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn_with_state(
            state.cors_config.clone(),
            enforce_origin,
        ))
        .layer(middleware::from_fn_with_state(env, handle_errors))
        .layer(middleware::from_fn_with_state(env, logging_middleware));

    apply_security_headers(router, env)
}
