//! Service configuration loaded from the environment

use std::time::Duration;

use thiserror::Error;

use crate::auth::password_policy::PasswordPolicy;
use crate::auth::rate_limit::RateLimitConfig;

/// Minimum length of the session signing secret, in bytes
pub const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be at least {min} bytes long")]
    TooShort { name: &'static str, min: usize },

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Cloud service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Apply the bundled migrations at boot
    pub run_migrations: bool,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    /// Upper bound for a whole request, external calls included
    pub request_timeout: Duration,
    /// Secret used to sign admin sessions and password reset tokens
    pub session_secret: String,
    pub session_ttl: Duration,
    pub reset_token_ttl: Duration,
    /// Per-identity budget for admin login and password reset requests
    pub login_limit: RateLimitConfig,
    pub password_policy: PasswordPolicy,
    /// S3 bucket for venue layout uploads
    pub upload_s3_bucket: String,
    /// Public base URL under which uploaded objects resolve
    pub upload_public_base_url: String,
    /// SES sender email address
    pub ses_from_email: String,
    /// Front-end base URL, used to build reset links
    pub app_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing or short `SESSION_SECRET` is an error in every environment:
    /// the service never signs sessions with a weak or generated key.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env_or("ENVIRONMENT", "development");

        let session_secret = require_session_secret(std::env::var("SESSION_SECRET").ok())?;

        let upload_s3_bucket = env_or("UPLOAD_S3_BUCKET", "venue-layouts");
        let upload_public_base_url = std::env::var("UPLOAD_PUBLIC_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("https://{upload_s3_bucket}.s3.amazonaws.com"));

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            http_port: parse_env("HTTP_PORT", 8080)?,
            environment,
            run_migrations: parse_env("RUN_MIGRATIONS", false)?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout: Duration::from_secs(parse_env("DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 30)?),
            session_secret,
            session_ttl: Duration::from_secs(parse_env::<u64>("SESSION_TTL_HOURS", 24)? * 3600),
            reset_token_ttl: Duration::from_secs(
                parse_env::<u64>("RESET_TOKEN_TTL_MINUTES", 60)? * 60,
            ),
            login_limit: RateLimitConfig {
                max_attempts: parse_env("LOGIN_MAX_ATTEMPTS", 5)?,
                window: Duration::from_millis(parse_env("LOGIN_WINDOW_MS", 15 * 60 * 1000)?),
            },
            password_policy: PasswordPolicy {
                min_length: parse_env("PASSWORD_MIN_LENGTH", 8)?,
                require_uppercase: parse_env("PASSWORD_REQUIRE_UPPERCASE", true)?,
                require_lowercase: parse_env("PASSWORD_REQUIRE_LOWERCASE", true)?,
                require_digit: parse_env("PASSWORD_REQUIRE_DIGIT", true)?,
                require_symbol: parse_env("PASSWORD_REQUIRE_SYMBOL", false)?,
            },
            upload_s3_bucket,
            upload_public_base_url: upload_public_base_url.trim_end_matches('/').to_string(),
            ses_from_email: env_or("SES_FROM_EMAIL", "noreply@example.com"),
            app_base_url: env_or("APP_BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Validate the raw `SESSION_SECRET` value.
pub fn require_session_secret(raw: Option<String>) -> Result<String, ConfigError> {
    let secret = raw
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::Missing("SESSION_SECRET"))?;
    if secret.len() < MIN_SESSION_SECRET_LEN {
        return Err(ConfigError::TooShort {
            name: "SESSION_SECRET",
            min: MIN_SESSION_SECRET_LEN,
        });
    }
    Ok(secret)
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value: raw })
        }
        _ => Ok(default),
    }
}
