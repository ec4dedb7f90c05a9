use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;

use nucleus_auth::{IdentityProvider, JwtIdentityProvider};
use nucleus_config::{AppEnv, CorsConfig, DocsConfig, IdentityConfig};

use crate::modules::auth::store::{AuthenticationStore, PgAuthenticationStore};
use crate::modules::docs::service::DocsAggregator;

#[derive(Clone)]
pub struct AppState {
    pub env: AppEnv,
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn AuthenticationStore>,
    pub docs: Arc<DocsAggregator>,
    pub cors_config: CorsConfig,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        env: AppEnv,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn AuthenticationStore>,
        docs: Arc<DocsAggregator>,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            env,
            identity,
            store,
            docs,
            cors_config,
            started_at: Instant::now(),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("env", &self.env)
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

/// Builds the production state: database pool (with migrations applied),
/// token identity provider and docs aggregator.
pub async fn init_app_state(env: AppEnv) -> anyhow::Result<AppState> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = nucleus_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(AppState::new(
        env,
        Arc::new(JwtIdentityProvider::new(IdentityConfig::from_env())),
        Arc::new(PgAuthenticationStore::new(pool)),
        Arc::new(DocsAggregator::new(DocsConfig::from_env(), env)),
        CorsConfig::from_env(),
    ))
}
