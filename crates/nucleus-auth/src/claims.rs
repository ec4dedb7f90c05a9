//! ID token claim structures and the authenticated principal.
//!
//! - [`IdTokenClaims`]: the signed payload of an ID token
//! - [`DecodedIdToken`]: what an [`IdentityProvider`](crate::IdentityProvider)
//!   returns after verifying a token
//! - [`Principal`]: the identity attached to a single request

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims carried by an ID token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Custom role claim, absent unless explicitly assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Token issuer
    pub iss: String,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: i64,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: i64,
    /// Any further custom claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedIdToken {
    pub uid: String,
    pub email: String,
    pub role: Option<String>,
    /// Every claim of the token, including the ones above.
    pub claims: Map<String, Value>,
}

impl DecodedIdToken {
    pub fn from_claims(claims: IdTokenClaims) -> Self {
        let uid = claims.sub.clone();
        let email = claims.email.clone();
        let role = claims.role.clone();
        let claims = match serde_json::to_value(claims) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        Self {
            uid,
            email,
            role,
            claims,
        }
    }
}

/// The authenticated identity of the current request.
///
/// Inserted into the request extensions by the token verification middleware
/// and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: Option<String>,
    pub claims: Map<String, Value>,
}

impl Principal {
    /// Lower-cased role, `None` when the role is absent or empty.
    pub fn normalized_role(&self) -> Option<String> {
        self.role
            .as_deref()
            .map(str::to_lowercase)
            .filter(|role| !role.is_empty())
    }
}

impl From<DecodedIdToken> for Principal {
    fn from(token: DecodedIdToken) -> Self {
        Self {
            id: token.uid,
            email: token.email,
            role: token.role,
            claims: token.claims,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(role: Option<&str>) -> IdTokenClaims {
        let mut extra = Map::new();
        extra.insert("tenant".into(), json!("north"));
        IdTokenClaims {
            sub: "uid-1".into(),
            email: "a@b.com".into(),
            role: role.map(Into::into),
            iss: "issuer".into(),
            iat: 1,
            exp: 2,
            extra,
        }
    }

    #[test]
    fn decoded_token_keeps_every_claim() {
        let decoded = DecodedIdToken::from_claims(claims(Some("admin")));
        assert_eq!(decoded.uid, "uid-1");
        assert_eq!(decoded.claims["tenant"], "north");
        assert_eq!(decoded.claims["role"], "admin");
        assert_eq!(decoded.claims["iss"], "issuer");
    }

    #[test]
    fn principal_role_is_optional_and_normalized() {
        let principal = Principal::from(DecodedIdToken::from_claims(claims(Some("ADMIN"))));
        assert_eq!(principal.normalized_role().as_deref(), Some("admin"));

        let principal = Principal::from(DecodedIdToken::from_claims(claims(None)));
        assert_eq!(principal.normalized_role(), None);
        assert!(!principal.claims.contains_key("role"));

        let principal = Principal::from(DecodedIdToken::from_claims(claims(Some(""))));
        assert_eq!(principal.normalized_role(), None);
    }
}
