//! Identity provider port.
//!
//! The API never talks to an identity backend directly. It verifies bearer
//! tokens and creates user identities through [`IdentityProvider`], which lets
//! the HTTP layer be tested against in-memory doubles.

use async_trait::async_trait;
use thiserror::Error;

use crate::claims::DecodedIdToken;

pub const CODE_ID_TOKEN_EXPIRED: &str = "auth/id-token-expired";
pub const CODE_ID_TOKEN_REVOKED: &str = "auth/id-token-revoked";
pub const CODE_INVALID_ID_TOKEN: &str = "auth/invalid-id-token";
pub const CODE_EMAIL_ALREADY_EXISTS: &str = "auth/email-already-exists";

/// Failure reported by an identity provider. Coded variants render their
/// provider code as part of the message.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("auth/id-token-expired: the ID token has expired")]
    TokenExpired,

    #[error("auth/id-token-revoked: the ID token has been revoked")]
    TokenRevoked,

    #[error("auth/invalid-id-token: {0}")]
    InvalidToken(String),

    #[error("auth/email-already-exists: {0} is already in use")]
    EmailAlreadyExists(String),

    #[error("{code}: {message}")]
    Provider { code: String, message: String },

    /// A rejection that carried no provider code at all.
    #[error("{0}")]
    Other(String),
}

impl IdentityError {
    pub fn code(&self) -> Option<&str> {
        match self {
            IdentityError::TokenExpired => Some(CODE_ID_TOKEN_EXPIRED),
            IdentityError::TokenRevoked => Some(CODE_ID_TOKEN_REVOKED),
            IdentityError::InvalidToken(_) => Some(CODE_INVALID_ID_TOKEN),
            IdentityError::EmailAlreadyExists(_) => Some(CODE_EMAIL_ALREADY_EXISTS),
            IdentityError::Provider { code, .. } => Some(code),
            IdentityError::Other(_) => None,
        }
    }
}

/// Identity to create in the provider.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub email_verified: bool,
    pub disabled: bool,
}

impl NewIdentity {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            email_verified: false,
            disabled: false,
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies an ID token and returns its decoded claims.
    async fn verify_id_token(&self, token: &str) -> Result<DecodedIdToken, IdentityError>;

    /// Creates a user identity and returns its provider UID.
    async fn create_user(&self, user: NewIdentity) -> Result<String, IdentityError>;
}
