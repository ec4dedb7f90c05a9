use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use nucleus_core::AppError;

use super::model::{AuthenticationRecord, Country};

/// Persistence of authentication records.
#[async_trait]
pub trait AuthenticationStore: Send + Sync {
    async fn create_authentication_record(
        &self,
        email: &str,
        role: i32,
        country: Option<Country>,
    ) -> Result<AuthenticationRecord, AppError>;
}

pub struct PgAuthenticationStore {
    pool: PgPool,
}

impl PgAuthenticationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthenticationStore for PgAuthenticationStore {
    async fn create_authentication_record(
        &self,
        email: &str,
        role: i32,
        country: Option<Country>,
    ) -> Result<AuthenticationRecord, AppError> {
        sqlx::query_as::<_, AuthenticationRecord>(
            "INSERT INTO authentication (user_email, user_role, user_country)
             VALUES ($1, $2, $3)
             RETURNING user_id, user_email, user_role, user_country",
        )
        .bind(email)
        .bind(role)
        .bind(country.map(|c| c.as_str()))
        .fetch_one(&self.pool)
        .await
        .context("Failed to create authentication record")
        .map_err(AppError::internal)
    }
}
