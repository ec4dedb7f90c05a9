use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use nucleus_config::AppEnv;

const LOG_DIR: &str = "logs";
const ACCESS_LOG: &str = "access.log";

/// Paths that are not logged outside production.
const QUIET_PATHS: [&str; 2] = ["/health", "/favicon.ico"];

pub async fn logging_middleware(State(env): State<AppEnv>, req: Request, next: Next) -> Response {
    if !env.is_production() && QUIET_PATHS.contains(&req.uri().path()) {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = uuid::Uuid::new_v4().to_string();

    let response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status().as_u16();

    match status {
        400..=499 => {
            warn!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = status,
                latency_ms = %latency.as_millis(),
                "Client error"
            );
        }
        500..=599 => {
            error!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = status,
                latency_ms = %latency.as_millis(),
                "Server error"
            );
        }
        _ => {
            info!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = status,
                latency_ms = %latency.as_millis(),
                "Request completed"
            );
        }
    }

    response
}

/// Installs the global subscriber.
///
/// Console output is compact in development and JSON in production. Outside
/// production an ANSI-free copy is also written to `logs/access.log`, rotated
/// daily. Keep the returned guard alive for as long as logs should be
/// flushed to the file.
pub fn init_tracing(env: AppEnv) -> Option<WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=info,tower_http=warn", env!("CARGO_CRATE_NAME")))
        })
    };

    let (console_layer, json_layer) = if env.is_production() {
        let json = fmt::layer()
            .json()
            .with_current_span(true)
            .with_filter(filter());
        (None, Some(json))
    } else {
        let console = fmt::layer()
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .compact()
            .with_filter(filter());
        (Some(console), None)
    };

    let appender = if env.is_production() {
        None
    } else {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(ACCESS_LOG)
            .build(LOG_DIR)
            .map_err(|e| eprintln!("Failed to open {LOG_DIR}/{ACCESS_LOG}: {e}"))
            .ok()
    };

    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_ansi(false)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .with(file_layer)
        .init();

    info!(env = %env, "Tracing initialized");
    guard
}
