//! # Nucleus Auth
//!
//! Identity types for the Nucleus API.
//!
//! This crate provides:
//!
//! - [`claims`]: ID token claims and the request [`Principal`]
//! - [`provider`]: the [`IdentityProvider`] port used to verify bearer tokens
//!   and create user identities
//! - [`jwt`]: [`JwtIdentityProvider`], an HS256 token issuer/verifier
//!
//! # Example
//!
//! ```ignore
//! use nucleus_auth::{IdentityProvider, JwtIdentityProvider};
//! use nucleus_config::IdentityConfig;
//!
//! let provider = JwtIdentityProvider::new(IdentityConfig::from_env());
//! let token = provider.issue_token("uid-1", "admin@example.com", Some("admin"))?;
//! let decoded = provider.verify_id_token(&token).await?;
//! assert_eq!(decoded.uid, "uid-1");
//! ```

pub mod claims;
pub mod jwt;
pub mod provider;

// Re-export commonly used types at crate root
pub use claims::{DecodedIdToken, IdTokenClaims, Principal};
pub use jwt::JwtIdentityProvider;
pub use provider::{IdentityError, IdentityProvider, NewIdentity};
