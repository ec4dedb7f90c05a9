//! # Nucleus Core
//!
//! Core error types for the Nucleus API.
//!
//! - [`errors`]: the [`AppError`] taxonomy and its HTTP rendering
//!
//! # Example
//!
//! ```ignore
//! use nucleus_core::AppError;
//!
//! // Operational errors are shown to the client as-is
//! let error = AppError::unauthorized("No authorization token provided");
//!
//! // Anything else is a non-operational 500
//! let error: AppError = std::io::Error::other("disk full").into();
//! ```

pub mod errors;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorBody, ErrorKind, ErrorReport, sanitize_status};
