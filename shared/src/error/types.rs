//! Error type and the JSON error body

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Detail key carrying the seconds until a rate-limit window resets.
///
/// Also emitted as a `Retry-After` header.
const RESET_IN_DETAIL: &str = "resetIn";

/// Application error with structured error code and details
///
/// This is the only error type that crosses the HTTP boundary:
/// - Standardized error codes via [`ErrorCode`]
/// - Short, non-technical messages
/// - Optional structured details (field names, retry delays)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create a not authenticated error
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create a rate-limited error carrying the retry delay in seconds
    pub fn too_many_attempts(reset_in: u64) -> Self {
        Self::with_message(
            ErrorCode::TooManyAttempts,
            format!("Too many attempts. Please try again in {reset_in} seconds"),
        )
        .with_detail(RESET_IN_DETAIL, reset_in)
    }

    /// Create an internal error with the generic message
    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError)
    }

    /// Retry delay attached by [`AppError::too_many_attempts`]
    pub fn reset_in(&self) -> Option<u64> {
        self.details
            .as_ref()
            .and_then(|d| d.get(RESET_IN_DETAIL))
            .and_then(Value::as_u64)
    }
}

/// JSON body of every error response: `{ code, message, details? }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code,
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        let mut response = (self.http_status(), Json(ErrorBody::from(&self))).into_response();
        if let Some(secs) = self.reset_in()
            && let Ok(value) = http::HeaderValue::from_str(&secs.to_string())
        {
            response
                .headers_mut()
                .insert(http::header::RETRY_AFTER, value);
        }
        response
    }
}
