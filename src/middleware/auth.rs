//! Bearer token verification.
//!
//! [`verify_token`] runs in front of protected routes. It reads the
//! `Authorization: Bearer <token>` header, verifies the token with the
//! configured [`IdentityProvider`] and inserts the resulting [`Principal`]
//! into the request extensions. Handlers read it back with the [`AuthUser`]
//! extractor. On any failure nothing is attached and the request is rejected
//! with a 401.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use nucleus_auth::provider::{
    CODE_ID_TOKEN_EXPIRED, CODE_ID_TOKEN_REVOKED, CODE_INVALID_ID_TOKEN,
};
use nucleus_auth::{IdentityError, IdentityProvider, Principal};
use nucleus_config::AppEnv;
use nucleus_core::AppError;

use crate::state::AppState;

pub const MISSING_TOKEN: &str = "No authorization token provided";
pub const INVALID_FORMAT: &str = "Invalid authorization format. Use Bearer token";
pub const TOKEN_EXPIRED: &str = "Token expired. Please sign in again";
pub const TOKEN_REVOKED: &str = "Token has been revoked. Please sign in again";
pub const TOKEN_INVALID: &str = "Invalid token. Please sign in again";
pub const AUTHENTICATION_FAILED: &str = "Failed to authenticate user";

const BEARER_PREFIX: &str = "Bearer ";

/// Middleware verifying the bearer token of the request.
///
/// ```rust,ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), verify_token));
/// ```
pub async fn verify_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = authenticate(
        state.identity.as_ref(),
        req.headers(),
        req.uri().path(),
        state.env,
    )
    .await?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Verifies the bearer credential in `headers`. Single pass, no retry.
pub async fn authenticate(
    identity: &dyn IdentityProvider,
    headers: &HeaderMap,
    path: &str,
    env: AppEnv,
) -> Result<Principal, AppError> {
    let token = bearer_token(headers)?;

    match identity.verify_id_token(token).await {
        Ok(decoded) => Ok(Principal::from(decoded)),
        Err(err) => {
            if !env.is_production() {
                tracing::warn!(path = %path, error = %err, "[Auth] Invalid token");
            }
            Err(map_identity_error(&err))
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = match headers.get(header::AUTHORIZATION) {
        None => return Err(AppError::unauthorized(MISSING_TOKEN)),
        Some(value) if value.is_empty() => return Err(AppError::unauthorized(MISSING_TOKEN)),
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::unauthorized(INVALID_FORMAT))?,
    };

    value
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| AppError::unauthorized(INVALID_FORMAT))
}

/// Maps a provider failure onto a client-facing 401 by inspecting the
/// provider code embedded in its message.
pub fn map_identity_error(err: &IdentityError) -> AppError {
    let message = err.to_string();
    if message.contains(CODE_ID_TOKEN_EXPIRED) {
        AppError::unauthorized(TOKEN_EXPIRED)
    } else if message.contains(CODE_ID_TOKEN_REVOKED) {
        AppError::unauthorized(TOKEN_REVOKED)
    } else if message.contains(CODE_INVALID_ID_TOKEN) {
        AppError::unauthorized(TOKEN_INVALID)
    } else {
        AppError::unauthorized(AUTHENTICATION_FAILED)
    }
}

/// Extractor for the principal attached by [`verify_token`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> Option<&str> {
        self.0.role.as_deref()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized(AUTHENTICATION_FAILED))
    }
}
