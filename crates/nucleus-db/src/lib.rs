//! # Nucleus DB
//!
//! Database pool construction for the Nucleus API.
//!
//! # Example
//!
//! ```ignore
//! let pool = nucleus_db::connect(&std::env::var("DATABASE_URL")?).await?;
//! sqlx::migrate!("./migrations").run(&pool).await?;
//! ```

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects a pool to the given database URL.
pub async fn connect(database_url: &str) -> Result<sqlx::PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;

    tracing::info!(max_connections = MAX_CONNECTIONS, "Database pool initialized");
    Ok(pool)
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
