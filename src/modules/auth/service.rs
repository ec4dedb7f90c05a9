use tracing::instrument;

use nucleus_auth::{IdentityProvider, NewIdentity};
use nucleus_core::AppError;

use super::model::{CreateUserRequest, CreateUserResponse};
use super::store::AuthenticationStore;

/// Initial password of identities created by an administrator. Users set
/// their own through the identity provider's reset flow.
const INITIAL_PASSWORD: &str = "create password here";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(identity, store, dto), fields(email = %dto.user_email))]
    pub async fn create_user(
        identity: &dyn IdentityProvider,
        store: &dyn AuthenticationStore,
        dto: CreateUserRequest,
    ) -> Result<CreateUserResponse, AppError> {
        let firebase_uid = identity
            .create_user(NewIdentity::new(&dto.user_email, INITIAL_PASSWORD))
            .await
            .map_err(AppError::internal)?;

        let record = store
            .create_authentication_record(&dto.user_email, dto.user_role, Some(dto.user_country))
            .await?;

        tracing::info!(user_id = record.user_id, uid = %firebase_uid, "User created");
        Ok(CreateUserResponse::new(record, firebase_uid))
    }
}
