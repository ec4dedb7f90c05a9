//! Terminal error handling.
//!
//! Handlers and middleware never write error bodies themselves: they return
//! an [`AppError`], which renders a default `{status, message}` body and
//! attaches an [`ErrorReport`] to the response. [`handle_errors`] sits
//! outside every route and is the single place where failures are logged and
//! the final error body is emitted.
//!
//! Failures that never produced an `AppError` are funnelled in as well:
//! panics are caught by [`handle_panic`] and method mismatches on known paths
//! are answered like unknown routes.

use std::any::Any;

use axum::{
    extract::{OriginalUri, Request, State},
    http::{StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};

use nucleus_config::AppEnv;
use nucleus_core::{AppError, ErrorReport};

/// Headers describing the original response that must not survive
/// re-rendering. `Allow` only makes sense on a 405.
const REPLACED_HEADERS: [header::HeaderName; 3] =
    [header::CONTENT_TYPE, header::CONTENT_LENGTH, header::ALLOW];

pub async fn handle_errors(State(env): State<AppEnv>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let target = request_target(
        req.extensions().get::<OriginalUri>().map(|u| &u.0),
        req.uri(),
    );

    let mut response = next.run(req).await;

    let report = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => report,
        None if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
            AppError::not_found(format!("Not found - {target}")).report()
        }
        None => return response,
    };

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    tracing::error!(
        timestamp = %timestamp,
        method = %method,
        path = %target,
        status = report.status.as_u16(),
        message = %report.message,
        "Request failed"
    );

    if !report.is_operational() {
        tracing::error!(
            timestamp = %timestamp,
            error = %report.trace,
            "Non-operational error"
        );
    }

    let headers = std::mem::take(response.headers_mut());
    let mut rendered = report.render(env.is_development());
    for (name, value) in headers.iter() {
        if !REPLACED_HEADERS.contains(name) {
            rendered.headers_mut().append(name, value.clone());
        }
    }
    rendered
}

/// Router fallback for unmatched routes.
pub async fn not_found(req: Request) -> AppError {
    let target = request_target(
        req.extensions().get::<OriginalUri>().map(|u| &u.0),
        req.uri(),
    );
    AppError::not_found(format!("Not found - {target}"))
}

/// Converts a caught panic into the terminal error contract.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    tracing::error!(panic = %detail, "Handler panicked");
    AppError::unexpected().into_response()
}

/// Request target used in logs and not-found messages: the original URI
/// (before any nesting), then the current URI, then the literal `undefined`.
pub fn request_target(original: Option<&Uri>, uri: &Uri) -> String {
    original
        .and_then(|u| u.path_and_query())
        .or_else(|| uri.path_and_query())
        .map(|pq| pq.as_str())
        .filter(|target| !target.is_empty())
        .unwrap_or("undefined")
        .to_string()
}
