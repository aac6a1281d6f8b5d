//! Service-layer errors
//!
//! Data-layer and AWS failures are logged here and reach the client only as
//! a generic system code. Business-rule errors pass through unchanged.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Postgres or other infrastructure failure
    #[error("database: {0}")]
    Db(BoxError),

    /// S3 rejected or never answered a layout upload
    #[error("layout storage: {0}")]
    Storage(BoxError),

    /// SES rejected or never answered a send
    #[error("email delivery: {0}")]
    Email(BoxError),

    #[error(transparent)]
    App(#[from] AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        Self::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        Self::Db(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        let (code, source) = match e {
            ServiceError::App(app_err) => return app_err,
            ServiceError::Db(source) => (ErrorCode::InternalError, source),
            ServiceError::Storage(source) => (ErrorCode::FileStorageFailed, source),
            ServiceError::Email(source) => (ErrorCode::EmailDeliveryFailed, source),
        };
        tracing::error!(error = %source, code = %code, "Service error");
        AppError::new(code)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        AppError::from(self).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_becomes_generic_internal_error() {
        let app: AppError = ServiceError::from(sqlx::Error::RowNotFound).into();
        assert_eq!(app.code, ErrorCode::InternalError);
        assert_eq!(app.message, "Internal server error");
    }

    #[test]
    fn test_aws_failures_map_to_their_own_codes() {
        let storage: AppError = ServiceError::Storage("bucket gone".into()).into();
        assert_eq!(storage.code, ErrorCode::FileStorageFailed);
        assert!(!storage.message.contains("bucket"));

        let email: AppError = ServiceError::Email("MessageRejected: unverified".into()).into();
        assert_eq!(email.code, ErrorCode::EmailDeliveryFailed);
        assert!(!email.message.contains("unverified"));
    }

    #[test]
    fn test_app_error_passes_through() {
        let err = ServiceError::from(AppError::new(ErrorCode::BookingNotFound));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::BookingNotFound);
        assert_eq!(app.message, "Booking not found");
    }
}
