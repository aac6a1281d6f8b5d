//! JSON body extractor answering malformed input with the API error envelope

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use shared::error::AppError;

/// Like [`axum::Json`], but any rejection (bad content type, syntax error,
/// unknown or mistyped field) becomes a 400 `InvalidRequest`.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected JSON body");
                Err(AppError::invalid_request("Invalid request body"))
            }
        }
    }
}

/// Trimmed, non-empty string field
pub fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
