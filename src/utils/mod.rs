//! Shared utilities.
//!
//! - [`response`]: the `{status, message, data}` success envelope

pub mod response;
