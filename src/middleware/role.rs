//! Role-based authorization middleware for Axum
//!
//! [`require_role`] builds a [`RoleGate`] from a list of allowed role names and
//! [`authorize`] enforces it against the [`Principal`] attached by
//! [`verify_token`](crate::middleware::auth::verify_token). The `developer`
//! role is always allowed and role names are compared case-insensitively.
//!
//! ```rust,ignore
//! use axum::{Router, middleware, routing::post};
//! use crate::middleware::role::{authorize, require_role};
//!
//! let routes = Router::new()
//!     .route("/user", post(create_user))
//!     .route_layer(middleware::from_fn_with_state(require_role(["admin"]), authorize))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), verify_token));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use nucleus_auth::Principal;
use nucleus_core::AppError;

pub const DEVELOPER_ROLE: &str = "developer";
pub const FORBIDDEN: &str = "Forbidden: insufficient permissions";

#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Arc<[String]>,
}

impl RoleGate {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed: Vec<String> = roles
            .into_iter()
            .map(|role| role.as_ref().trim().to_lowercase())
            .filter(|role| !role.is_empty())
            .collect();
        if !allowed.iter().any(|role| role == DEVELOPER_ROLE) {
            allowed.push(DEVELOPER_ROLE.to_string());
        }

        Self {
            allowed: allowed.into(),
        }
    }

    pub fn allowed_roles(&self) -> &[String] {
        &self.allowed
    }

    /// Checks `principal` against the gate. A missing principal is treated
    /// like a principal without a role.
    pub fn check(&self, principal: Option<&Principal>, path: &str) -> Result<(), AppError> {
        let role = principal.and_then(Principal::normalized_role);

        let Some(role) = role else {
            tracing::warn!(path = %path, "[Role] Principal has no role");
            tracing::warn!(role = "none", path = %path, "[Role] Access denied");
            return Err(AppError::forbidden(FORBIDDEN));
        };

        if self.allowed.iter().any(|allowed| *allowed == role) {
            return Ok(());
        }

        tracing::warn!(role = %role, path = %path, "[Role] Access denied");
        Err(AppError::forbidden(FORBIDDEN))
    }
}

/// Creates a gate allowing `roles` plus `developer`.
pub fn require_role<I, S>(roles: I) -> RoleGate
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    RoleGate::new(roles)
}

pub async fn authorize(
    State(gate): State<RoleGate>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate.check(req.extensions().get::<Principal>(), req.uri().path())?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn principal(role: Option<&str>) -> Principal {
        Principal {
            id: "user123".to_string(),
            email: "test@example.com".to_string(),
            role: role.map(str::to_string),
            claims: Map::new(),
        }
    }

    #[test]
    fn configured_roles_are_normalized() {
        let gate = require_role(["Admin", " ", "TUTOR"]);
        assert_eq!(gate.allowed_roles(), ["admin", "tutor", "developer"]);
    }

    #[test]
    fn developer_is_not_duplicated() {
        let gate = require_role(["developer", "admin"]);
        assert_eq!(gate.allowed_roles(), ["developer", "admin"]);
    }

    #[test]
    fn empty_role_is_treated_as_missing() {
        let gate = require_role(["admin"]);
        let err = gate.check(Some(&principal(Some(""))), "/x").unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.message(), FORBIDDEN);
    }
}
