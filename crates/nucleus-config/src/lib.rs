//! # Nucleus Config
//!
//! Configuration types for the Nucleus API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`env`]: the active runtime environment (`NODE_ENV`)
//! - [`server`]: listen port
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`identity`]: identity provider (ID token) configuration
//! - [`docs`]: OpenAPI document locations
//!
//! # Example
//!
//! ```ignore
//! use nucleus_config::{AppEnv, CorsConfig, IdentityConfig};
//!
//! let env = AppEnv::from_env();
//! let cors_config = CorsConfig::from_env();
//! let identity_config = IdentityConfig::from_env();
//! ```

pub mod cors;
pub mod docs;
pub mod env;
pub mod identity;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use docs::DocsConfig;
pub use env::AppEnv;
pub use identity::IdentityConfig;
pub use server::ServerConfig;
