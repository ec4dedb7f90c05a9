mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use common::{TEST_ORIGIN, TestApp};
use serde_json::json;

use nucleus_config::AppEnv;

#[tokio::test]
async fn test_root_reports_running() {
    let app = TestApp::new(AppEnv::Test);

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"status": 200, "message": "Shree Nucleus API is running!"})
    );
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(AppEnv::Test);

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "OK");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new(AppEnv::Test);

    let response = app.get("/nope").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.json(),
        json!({"status": 404, "message": "Not found - /nope"})
    );
}

#[tokio::test]
async fn test_not_found_keeps_query_string() {
    let app = TestApp::new(AppEnv::Test);

    let response = app.get("/nope?page=2").await;

    assert_eq!(response.json()["message"], "Not found - /nope?page=2");
}

#[tokio::test]
async fn test_not_found_in_development_includes_trace() {
    let app = TestApp::new(AppEnv::Development);

    let response = app.get("/nope").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let body = response.json();
    assert_eq!(body["message"], "Not found - /nope");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_errors_never_include_trace_in_production() {
    let app = TestApp::new(AppEnv::Production);

    let response = app.get("/nope").await;

    assert!(response.json().get("error").is_none());
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = TestApp::new(AppEnv::Test);

    let response = app.get("/").await;

    assert_eq!(
        response.header("referrer-policy"),
        Some("strict-origin-when-cross-origin")
    );
    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(response.header("x-dns-prefetch-control"), Some("off"));
    assert_eq!(response.header("x-download-options"), Some("noopen"));
    assert_eq!(
        response.header("x-permitted-cross-domain-policies"),
        Some("none")
    );
    assert_eq!(response.header("origin-agent-cluster"), Some("?1"));
    assert!(response.header("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_security_headers_on_error_responses() {
    let app = TestApp::new(AppEnv::Test);

    let response = app.get("/nope").await;

    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
}

#[tokio::test]
async fn test_hsts_only_in_production() {
    let app = TestApp::new(AppEnv::Production);

    let response = app.get("/").await;

    assert_eq!(
        response.header("strict-transport-security"),
        Some("max-age=31536000; includeSubDomains; preload")
    );
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = TestApp::new(AppEnv::Test);
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, TEST_ORIGIN)
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin"),
        Some(TEST_ORIGIN)
    );
    assert_eq!(
        response.header("access-control-allow-credentials"),
        Some("true")
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let app = TestApp::new(AppEnv::Test);
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({"status": 500, "message": "Origin https://evil.example not allowed by CORS policy"})
    );
    assert!(response.header("access-control-allow-origin").is_none());
    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin_preflight() {
    let app = TestApp::new(AppEnv::Test);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/auth/user")
        .header(header::ORIGIN, "https://evil.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.header("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_cors_rejection_includes_trace_in_development() {
    let app = TestApp::new(AppEnv::Development);
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json()["error"].as_str().is_some());
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = TestApp::new(AppEnv::Test);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/auth/user")
        .header(header::ORIGIN, TEST_ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin"),
        Some(TEST_ORIGIN)
    );
    assert_eq!(response.header("access-control-max-age"), Some("86400"));
    let methods = response.header("access-control-allow-methods").unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("PATCH"));
}
