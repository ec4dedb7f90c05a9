use axum::{Router, routing::get};
use utoipa_swagger_ui::{Config, SwaggerUi};

use crate::state::AppState;

use super::controller::{openapi_json, openapi_yaml};

/// `/docs` (Swagger UI), `/docs/json` and `/docs/yaml`.
pub fn init_docs_router() -> Router<AppState> {
    Router::new()
        .route("/docs/json", get(openapi_json))
        .route("/docs/yaml", get(openapi_yaml))
        .merge(SwaggerUi::new("/docs").config(Config::from("/docs/json")))
}
