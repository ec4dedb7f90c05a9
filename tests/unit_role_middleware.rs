use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Router, middleware, routing::get};
use serde_json::Map;
use tower::ServiceExt;

use nucleus::middleware::role::{FORBIDDEN, authorize, require_role};
use nucleus_auth::Principal;

fn create_test_principal(role: Option<&str>) -> Principal {
    Principal {
        id: "00000000-0000-0000-0000-000000000000".to_string(),
        email: "test@example.com".to_string(),
        role: role.map(str::to_string),
        claims: Map::new(),
    }
}

#[test]
fn test_check_role_exact_match() {
    let gate = require_role(["admin"]);
    assert!(gate.check(Some(&create_test_principal(Some("admin"))), "/x").is_ok());

    let gate = require_role(["tutor", "student"]);
    assert!(gate.check(Some(&create_test_principal(Some("tutor"))), "/x").is_ok());
    assert!(gate.check(Some(&create_test_principal(Some("student"))), "/x").is_ok());
}

#[test]
fn test_check_role_is_case_insensitive() {
    let gate = require_role(["admin"]);
    assert!(gate.check(Some(&create_test_principal(Some("ADMIN"))), "/x").is_ok());

    let gate = require_role(["Admin"]);
    assert!(gate.check(Some(&create_test_principal(Some("aDmIn"))), "/x").is_ok());
}

#[test]
fn test_check_role_no_match() {
    let gate = require_role(["admin"]);
    let err = gate
        .check(Some(&create_test_principal(Some("student"))), "/x")
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert_eq!(err.message(), FORBIDDEN);
    assert!(err.is_operational());
}

#[test]
fn test_developer_always_allowed() {
    let gate = require_role(["admin"]);
    assert!(gate.check(Some(&create_test_principal(Some("developer"))), "/x").is_ok());

    let gate = require_role(Vec::<String>::new());
    assert!(gate.check(Some(&create_test_principal(Some("Developer"))), "/x").is_ok());
}

#[test]
fn test_empty_gate_denies_everything_but_developer() {
    let gate = require_role(Vec::<&str>::new());
    assert!(gate.check(Some(&create_test_principal(Some("admin"))), "/x").is_err());
}

#[test]
fn test_missing_role_always_denied() {
    let gate = require_role(["admin", "student", "tutor"]);
    let err = gate
        .check(Some(&create_test_principal(None)), "/x")
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[test]
fn test_missing_principal_always_denied() {
    let gate = require_role(["admin"]);
    let err = gate.check(None, "/x").unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert_eq!(err.message(), FORBIDDEN);
}

fn gated_router(principal: Option<Principal>) -> Router {
    let router = Router::new()
        .route("/gated", get(|| async { "ok" }))
        .route_layer(middleware::from_fn_with_state(
            require_role(["admin"]),
            authorize,
        ));

    match principal {
        Some(principal) => router.layer(middleware::from_fn(
            move |mut req: axum::extract::Request, next: middleware::Next| {
                let principal = principal.clone();
                async move {
                    req.extensions_mut().insert(principal);
                    next.run(req).await
                }
            },
        )),
        None => router,
    }
}

async fn status_of(router: Router) -> StatusCode {
    router
        .oneshot(Request::builder().uri("/gated").body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_authorize_passes_allowed_principal() {
    let router = gated_router(Some(create_test_principal(Some("Admin"))));
    assert_eq!(status_of(router).await, StatusCode::OK);
}

#[tokio::test]
async fn test_authorize_rejects_other_roles() {
    let router = gated_router(Some(create_test_principal(Some("student"))));
    assert_eq!(status_of(router).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_authorize_rejects_missing_principal() {
    assert_eq!(status_of(gated_router(None)).await, StatusCode::FORBIDDEN);
}
