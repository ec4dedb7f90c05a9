//! In-memory collaborators for tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use nucleus_core::AppError;

use crate::modules::auth::model::{AuthenticationRecord, Country};
use crate::modules::auth::store::AuthenticationStore;

/// [`AuthenticationStore`] keeping records in a vector. Enforces the same
/// email uniqueness as the `authentication` table.
#[derive(Debug, Default)]
pub struct InMemoryAuthenticationStore {
    records: Mutex<Vec<AuthenticationRecord>>,
}

impl InMemoryAuthenticationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuthenticationRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AuthenticationStore for InMemoryAuthenticationStore {
    async fn create_authentication_record(
        &self,
        email: &str,
        role: i32,
        country: Option<Country>,
    ) -> Result<AuthenticationRecord, AppError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if records.iter().any(|r| r.user_email == email) {
            return Err(AppError::internal(anyhow::anyhow!(
                "duplicate key value violates unique constraint \"authentication_user_email_key\""
            )));
        }

        let record = AuthenticationRecord {
            user_id: records.len() as i32 + 1,
            user_email: email.to_string(),
            user_role: role,
            user_country: country.map(|c| c.as_str().to_string()),
        };
        records.push(record.clone());
        Ok(record)
    }
}
