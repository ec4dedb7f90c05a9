use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use nucleus_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

use super::model::{CreateUserRequest, CreateUserResponse};
use super::service::AuthService;

/// Create a new user
///
/// Creates the identity in the identity provider, then the authentication
/// record. Requires the `admin` or `developer` role.
#[instrument(skip(state, auth_user, dto), fields(by = %auth_user.id()))]
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateUserResponse>>), AppError> {
    let user = AuthService::create_user(state.identity.as_ref(), state.store.as_ref(), dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            StatusCode::CREATED,
            "User created successfully",
            user,
        )),
    ))
}
