//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: bearer token verification and the [`AuthUser`](auth::AuthUser) extractor
//! - [`role`]: role gate applied after token verification
//! - [`error`]: terminal error handler, not-found fallback and panic conversion
//! - [`security`]: CORS and security response headers
//!
//! # Request Flow
//!
//! 1. CORS and security headers wrap every response
//! 2. Requests are logged, then enter the terminal error handler
//! 3. Protected routes run `verify_token`, then the role gate
//! 4. The handler extracts and validates its body and runs
//! 5. Any `AppError` on the way back is logged and rendered by `handle_errors`

pub mod auth;
pub mod error;
pub mod role;
pub mod security;
