use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::state::AppState;

use super::service::DocsError;

pub const GENERATION_FAILED: &str = "Error generating OpenAPI specification";

/// Merged OpenAPI document as JSON
pub async fn openapi_json(State(state): State<AppState>) -> Response {
    match state.docs.to_json().await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => generation_failed(err),
    }
}

/// Merged OpenAPI document as YAML
pub async fn openapi_yaml(State(state): State<AppState>) -> Response {
    match state.docs.to_yaml().await {
        Ok(body) => ([(header::CONTENT_TYPE, "text/yaml")], body).into_response(),
        Err(err) => generation_failed(err),
    }
}

fn generation_failed(err: DocsError) -> Response {
    tracing::error!(error = %err, "Error combining OpenAPI specs");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": 500,
            "message": GENERATION_FAILED,
            "error": { "message": err.to_string() }
        })),
    )
        .into_response()
}
