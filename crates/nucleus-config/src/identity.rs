use std::env;

/// Settings for the token-based identity provider.
///
/// # Environment Variables
///
/// - `IDENTITY_JWT_SECRET`: HMAC secret used to sign and verify ID tokens (required)
/// - `IDENTITY_ISSUER`: expected `iss` claim (default: `shree-nucleus`)
/// - `IDENTITY_TOKEN_TTL`: lifetime of issued tokens in seconds (default: `3600`)
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub secret: String,
    pub issuer: String,
    pub token_ttl_secs: i64,
}

impl IdentityConfig {
    /// # Panics
    ///
    /// Panics if `IDENTITY_JWT_SECRET` is not set.
    pub fn from_env() -> Self {
        Self {
            secret: env::var("IDENTITY_JWT_SECRET").expect("IDENTITY_JWT_SECRET must be set"),
            issuer: env::var("IDENTITY_ISSUER").unwrap_or_else(|_| "shree-nucleus".into()),
            token_ttl_secs: env::var("IDENTITY_TOKEN_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        }
    }
}
