use clap::Parser;
use dotenvy::dotenv;

use nucleus::cli::{Cli, run};
use nucleus::logging::init_tracing;
use nucleus_config::AppEnv;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    let (env, unknown_env) = AppEnv::resolve(std::env::var("NODE_ENV").ok().as_deref());
    let _guard = init_tracing(env);
    if let Some(value) = unknown_env {
        nucleus_config::env::warn_unknown(&value);
    }

    if let Err(e) = run(cli, env).await {
        tracing::error!(error = ?e, "Fatal error");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
