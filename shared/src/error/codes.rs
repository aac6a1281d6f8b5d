//! Unified error codes for the venue platform
//!
//! Every error that crosses the HTTP boundary carries one of these codes.
//! Codes are grouped by leading digit:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Business / platform administration errors
//! - 4xxx: Order and booking errors
//! - 6xxx: File upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare `u16` so that dashboard clients can switch on it
/// without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Too many attempts, retry after the window resets
    TooManyAttempts = 1008,
    /// Password reset token invalid, expired or already used
    InvalidOrExpiredToken = 1009,
    /// Password does not satisfy the strength policy
    WeakPassword = 1010,

    // ==================== 2xxx: Permission ====================
    /// Platform admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Business ====================
    /// Platform settings value rejected
    SettingsInvalid = 3003,

    // ==================== 4xxx: Order ====================
    /// No table booking exists for the order
    BookingNotFound = 4002,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// File content does not match its declared type
    InvalidFileContent = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Outbound email could not be delivered to the provider
    EmailDeliveryFailed = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the user-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            ErrorCode::NotAuthenticated => "Unauthorized",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TooManyAttempts => "Too many attempts. Please try again later",
            ErrorCode::InvalidOrExpiredToken => "Invalid or expired reset token",
            ErrorCode::WeakPassword => "Password does not meet the security requirements",

            ErrorCode::AdminRequired => "Platform administrator role is required",

            ErrorCode::SettingsInvalid => "Invalid settings value",

            ErrorCode::BookingNotFound => "Booking not found",

            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidFileContent => "File content does not match its type",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::FileStorageFailed => "File storage failed",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::EmailDeliveryFailed => "Email could not be sent",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Returned when a numeric value does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Ok(match value {
            5 => ErrorCode::InvalidRequest,
            7 => ErrorCode::RequiredField,
            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1008 => ErrorCode::TooManyAttempts,
            1009 => ErrorCode::InvalidOrExpiredToken,
            1010 => ErrorCode::WeakPassword,
            2003 => ErrorCode::AdminRequired,
            3003 => ErrorCode::SettingsInvalid,
            4002 => ErrorCode::BookingNotFound,
            6501 => ErrorCode::FileTooLarge,
            6502 => ErrorCode::UnsupportedFileFormat,
            6503 => ErrorCode::InvalidFileContent,
            6504 => ErrorCode::NoFileProvided,
            6505 => ErrorCode::EmptyFile,
            6509 => ErrorCode::FileStorageFailed,
            9001 => ErrorCode::InternalError,
            9006 => ErrorCode::EmailDeliveryFailed,
            _ => return Err(InvalidErrorCode(value)),
        })
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
