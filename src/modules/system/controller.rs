use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;
use crate::utils::response::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: u16,
    pub message: &'static str,
    pub timestamp: String,
    /// Seconds since the application state was built.
    pub uptime: f64,
}

pub async fn root() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message(
        StatusCode::OK,
        "Shree Nucleus API is running!",
    ))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: StatusCode::OK.as_u16(),
        message: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
