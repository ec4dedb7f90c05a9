//! CORS policy and security response headers.

use std::time::Duration;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use nucleus_config::{AppEnv, CorsConfig, cors::CORS_MAX_AGE_SECS};
use nucleus_core::AppError;

pub const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains; preload";

/// Rejects requests whose `Origin` is not on the allow-list before any route
/// runs. Requests without an `Origin` header pass.
///
/// The rejection is a non-operational 500 handled by the terminal error
/// handler, preflight requests included.
pub async fn enforce_origin(
    State(config): State<CorsConfig>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        let origin = String::from_utf8_lossy(origin.as_bytes());
        if !config.is_allowed(&origin) {
            tracing::warn!(origin = %origin, "[CORS] Blocked origin");
            return Err(AppError::with_kind(
                format!("Origin {origin} not allowed by CORS policy"),
                500,
                false,
            ));
        }
    }

    Ok(next.run(req).await)
}

/// Builds the CORS layer from the configured allow-list. It sits inside
/// [`enforce_origin`], so only allowed origins normally reach it.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let config = config.clone();
    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
        origin
            .to_str()
            .is_ok_and(|origin| config.is_allowed(origin))
    });

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_DISPOSITION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(CORS_MAX_AGE_SECS))
}

/// Adds the security headers to every response that does not already set
/// them. HSTS is only sent in production.
pub fn apply_security_headers(router: Router, env: AppEnv) -> Router {
    let hsts = env
        .is_production()
        .then(|| HeaderValue::from_static(HSTS_VALUE));

    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_DNS_PREFETCH_CONTROL,
            HeaderValue::from_static("off"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-download-options"),
            HeaderValue::from_static("noopen"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-permitted-cross-domain-policies"),
            HeaderValue::from_static("none"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("origin-agent-cluster"),
            HeaderValue::from_static("?1"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            hsts,
        ))
}
