#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use nucleus::modules::docs::DocsAggregator;
use nucleus::router::init_router;
use nucleus::state::AppState;
use nucleus::testing::InMemoryAuthenticationStore;
use nucleus_auth::JwtIdentityProvider;
use nucleus_config::{AppEnv, CorsConfig, DocsConfig, IdentityConfig};

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";
pub const TEST_ISSUER: &str = "nucleus-test";
pub const TEST_ORIGIN: &str = "http://localhost:3000";

pub fn identity_config() -> IdentityConfig {
    IdentityConfig {
        secret: TEST_SECRET.to_string(),
        issuer: TEST_ISSUER.to_string(),
        token_ttl_secs: 3600,
    }
}

/// Docs of this repository: `docs/main.yaml` plus the module fragments.
pub fn repo_docs_config() -> DocsConfig {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    DocsConfig {
        root_document: root.join("docs/main.yaml"),
        modules_dir: root.join("src/modules"),
    }
}

pub struct TestApp {
    pub router: Router,
    pub identity: Arc<JwtIdentityProvider>,
    pub store: Arc<InMemoryAuthenticationStore>,
    pub docs: Arc<DocsAggregator>,
}

impl TestApp {
    pub fn new(env: AppEnv) -> Self {
        Self::with_docs(env, repo_docs_config())
    }

    pub fn with_docs(env: AppEnv, docs_config: DocsConfig) -> Self {
        let identity = Arc::new(JwtIdentityProvider::new(identity_config()));
        let store = Arc::new(InMemoryAuthenticationStore::new());
        let docs = Arc::new(DocsAggregator::new(docs_config, env));

        let state = AppState::new(
            env,
            identity.clone(),
            store.clone(),
            docs.clone(),
            CorsConfig::from_list(TEST_ORIGIN),
        );

        Self {
            router: init_router(state),
            identity,
            store,
            docs,
        }
    }

    pub fn token(&self, role: Option<&str>) -> String {
        self.identity
            .issue_token("uid-test", "tester@example.com", role)
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub fn create_user_request(token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/auth/user")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}
