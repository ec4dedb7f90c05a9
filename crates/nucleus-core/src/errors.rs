//! Application error taxonomy.
//!
//! Every failure that leaves a handler or middleware is an [`AppError`]. An
//! error is either [`ErrorKind::Operational`] (an anticipated, client-facing
//! failure such as a validation, auth or not-found error) or
//! [`ErrorKind::Generic`] (anything unexpected). Operational errors are only
//! produced by the constructors on [`AppError`]; every other error value that
//! is converted into an `AppError` becomes generic with status 500.
//!
//! The status code is stored exactly as given. It is sanitized when the
//! response is rendered: codes outside `100..=599` are sent as 500.

use std::fmt;
use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Message used when the failing value carries no usable message.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Anticipated failure, safe to show to the client as-is.
    Operational,
    /// Bug or infrastructure failure.
    Generic,
}

#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    status: u16,
    message: String,
    source: Option<anyhow::Error>,
    location: &'static Location<'static>,
}

impl AppError {
    /// Creates an operational error.
    #[track_caller]
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self::with_kind(message, status, true)
    }

    /// Creates an error with an explicit operational flag. The status code is
    /// not validated here.
    #[track_caller]
    pub fn with_kind(message: impl Into<String>, status: u16, is_operational: bool) -> Self {
        Self {
            kind: if is_operational {
                ErrorKind::Operational
            } else {
                ErrorKind::Generic
            },
            status,
            message: message.into(),
            source: None,
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST.as_u16())
    }

    #[track_caller]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::UNAUTHORIZED.as_u16())
    }

    #[track_caller]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::FORBIDDEN.as_u16())
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::NOT_FOUND.as_u16())
    }

    #[track_caller]
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::UNPROCESSABLE_ENTITY.as_u16())
    }

    /// Wraps an arbitrary error as a non-operational 500, keeping its message.
    #[track_caller]
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        let err = err.into();
        Self {
            kind: ErrorKind::Generic,
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            message: err.to_string(),
            source: Some(err),
            location: Location::caller(),
        }
    }

    /// Error for a failure that carried no error value at all (e.g. a panic
    /// payload).
    #[track_caller]
    pub fn unexpected() -> Self {
        Self::with_kind(
            UNEXPECTED_ERROR_MESSAGE,
            StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            false,
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_operational(&self) -> bool {
        self.kind == ErrorKind::Operational
    }

    /// The status code as constructed, before sanitization.
    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Builds the report consumed by the terminal error handler.
    pub fn report(&self) -> ErrorReport {
        let trace = match (&self.source, self.message.as_str()) {
            (Some(source), _) => format!("{source:?}\n    at {}", self.location),
            (None, UNEXPECTED_ERROR_MESSAGE) if self.kind == ErrorKind::Generic => {
                "Unknown error".to_string()
            }
            (None, message) => format!("Error: {message}\n    at {}", self.location),
        };

        ErrorReport {
            status: sanitize_status(self.status),
            message: self.message.clone(),
            kind: self.kind,
            trace,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    #[track_caller]
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

/// Maps any code outside the valid HTTP range to 500.
pub fn sanitize_status(status: u16) -> StatusCode {
    if !(100..=599).contains(&status) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Normalized error, attached to error responses as an extension so the
/// terminal handler can log it and re-render it.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    pub kind: ErrorKind,
    pub trace: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorReport {
    pub fn is_operational(&self) -> bool {
        self.kind == ErrorKind::Operational
    }

    /// Renders `{status, message}`, plus the trace under `error` when
    /// `include_trace` is set.
    pub fn render(self, include_trace: bool) -> Response {
        let body = ErrorBody {
            status: self.status.as_u16(),
            message: self.message.clone(),
            error: include_trace.then(|| self.trace.clone()),
        };

        let status = self.status;
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report().render(false)
    }
}
