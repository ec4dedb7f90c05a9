use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use nucleus_core::AppError;

pub const VALIDATION_FAILED: &str = "Request Data Validation failed";
pub const INVALID_BODY: &str = "Invalid request body";

fn format_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// JSON body extractor that also runs `validator` rules.
///
/// Malformed JSON is a 400. Everything else that makes the body unusable
/// (wrong content type, missing or mistyped fields, failed rules) is a 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
                match rejection {
                    JsonRejection::JsonSyntaxError(_) | JsonRejection::BytesRejection(_) => {
                        AppError::bad_request(INVALID_BODY)
                    }
                    _ => AppError::unprocessable(VALIDATION_FAILED),
                }
            })?;

        value.validate().map_err(|errors| {
            tracing::debug!(errors = %format_errors(&errors), "Request validation failed");
            AppError::unprocessable(VALIDATION_FAILED)
        })?;

        Ok(ValidatedJson(value))
    }
}
