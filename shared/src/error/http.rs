//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::BookingNotFound => StatusCode::NOT_FOUND,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::AdminRequired => StatusCode::FORBIDDEN,

            // 429 Too Many Requests
            Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            Self::InternalError | Self::FileStorageFailed | Self::EmailDeliveryFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation, tokens, uploads)
            Self::InvalidRequest
            | Self::RequiredField
            | Self::InvalidOrExpiredToken
            | Self::WeakPassword
            | Self::SettingsInvalid
            | Self::FileTooLarge
            | Self::UnsupportedFileFormat
            | Self::InvalidFileContent
            | Self::NoFileProvided
            | Self::EmptyFile => StatusCode::BAD_REQUEST,
        }
    }
}
