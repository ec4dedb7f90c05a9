//! HS256 ID token provider.
//!
//! [`JwtIdentityProvider`] issues and verifies ID tokens signed with the
//! configured secret. User identities and revocations are held in memory for
//! the lifetime of the process.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde_json::Map;
use uuid::Uuid;

use nucleus_config::IdentityConfig;

use crate::claims::{DecodedIdToken, IdTokenClaims};
use crate::provider::{IdentityError, IdentityProvider, NewIdentity};

pub struct JwtIdentityProvider {
    config: IdentityConfig,
    /// email -> uid
    users: RwLock<HashMap<String, String>>,
    /// uid -> revocation timestamp
    revocations: RwLock<HashMap<String, i64>>,
}

impl JwtIdentityProvider {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            config,
            users: RwLock::new(HashMap::new()),
            revocations: RwLock::new(HashMap::new()),
        }
    }

    /// Issues a token valid for the configured lifetime.
    pub fn issue_token(
        &self,
        uid: &str,
        email: &str,
        role: Option<&str>,
    ) -> Result<String, IdentityError> {
        let now = Utc::now().timestamp();
        self.issue_token_with_times(uid, email, role, now, now + self.config.token_ttl_secs)
    }

    pub fn issue_token_with_times(
        &self,
        uid: &str,
        email: &str,
        role: Option<&str>,
        issued_at: i64,
        expires_at: i64,
    ) -> Result<String, IdentityError> {
        let claims = IdTokenClaims {
            sub: uid.to_string(),
            email: email.to_string(),
            role: role.map(str::to_string),
            iss: self.config.issuer.clone(),
            iat: issued_at,
            exp: expires_at,
            extra: Map::new(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| IdentityError::Provider {
            code: "auth/internal-error".to_string(),
            message: format!("Failed to sign token: {e}"),
        })
    }

    /// Revokes every token issued to `uid` before the current second. Tokens
    /// issued from this second on stay valid, so a fresh sign-in right after
    /// revocation is accepted.
    pub fn revoke_refresh_tokens(&self, uid: &str) {
        self.revocations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uid.to_string(), Utc::now().timestamp());
        tracing::info!(uid = %uid, "Revoked tokens");
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation
    }

    fn is_revoked(&self, claims: &IdTokenClaims) -> bool {
        self.revocations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&claims.sub)
            .is_some_and(|revoked_at| claims.iat < *revoked_at)
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_id_token(&self, token: &str) -> Result<DecodedIdToken, IdentityError> {
        let data = decode::<IdTokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &self.validation(),
        )
        .map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => IdentityError::TokenExpired,
            _ => IdentityError::InvalidToken(e.to_string()),
        })?;

        if self.is_revoked(&data.claims) {
            return Err(IdentityError::TokenRevoked);
        }

        Ok(DecodedIdToken::from_claims(data.claims))
    }

    async fn create_user(&self, user: NewIdentity) -> Result<String, IdentityError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let email = user.email.to_lowercase();
        if users.contains_key(&email) {
            return Err(IdentityError::EmailAlreadyExists(user.email));
        }

        let uid = Uuid::new_v4().simple().to_string();
        users.insert(email, uid.clone());
        tracing::info!(uid = %uid, "Created identity");
        Ok(uid)
    }
}
