//! Command line interface of the `nucleus` binary.

use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use nucleus_auth::JwtIdentityProvider;
use nucleus_config::{AppEnv, DocsConfig, IdentityConfig, ServerConfig};

use crate::modules::docs::DocsAggregator;
use crate::router::init_router;
use crate::state::init_app_state;

#[derive(Parser)]
#[command(name = "nucleus")]
#[command(about = "Shree Nucleus API server and tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Print a signed ID token for local testing
    IssueToken {
        /// User ID placed in the `sub` claim
        #[arg(short = 'u', long)]
        uid: String,

        /// Email address
        #[arg(short = 'e', long)]
        email: String,

        /// Role claim, e.g. `admin`
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
    /// Print the merged OpenAPI document
    ExportDocs {
        #[arg(short = 'f', long, value_enum, default_value_t = DocsFormat::Yaml)]
        format: DocsFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DocsFormat {
    Json,
    Yaml,
}

pub async fn run(cli: Cli, env: AppEnv) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(env).await,
        Commands::IssueToken { uid, email, role } => {
            let provider = JwtIdentityProvider::new(IdentityConfig::from_env());
            let token = provider.issue_token(&uid, &email, role.as_deref())?;
            println!("{token}");
            Ok(())
        }
        Commands::ExportDocs { format } => {
            let docs = DocsAggregator::new(DocsConfig::from_env(), env);
            let output = match format {
                DocsFormat::Json => {
                    let document = docs.document().await?;
                    serde_json::to_string_pretty(document.as_ref())?
                }
                DocsFormat::Yaml => docs.to_yaml().await?,
            };
            println!("{output}");
            Ok(())
        }
    }
}

pub async fn serve(env: AppEnv) -> anyhow::Result<()> {
    let server = ServerConfig::from_env();
    let state = init_app_state(env).await?;
    let app = init_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(port = server.port, env = %env, "Server running on http://localhost:{}", server.port);
    tracing::info!("Swagger UI available at http://localhost:{}/docs", server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
