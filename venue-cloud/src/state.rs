//! Application state for venue-cloud

use std::time::Duration;

use aws_sdk_s3::Client as S3Client;
use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::password_policy::PasswordPolicy;
use crate::auth::{RateLimitConfig, RateLimiter, TokenSigner};
use crate::config::Config;
use crate::error::BoxError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Session and reset-token signing keys
    pub tokens: TokenSigner,
    /// Rate limiter for login and password reset routes
    pub rate_limiter: RateLimiter,
    pub login_limit: RateLimitConfig,
    pub password_policy: PasswordPolicy,
    pub reset_token_ttl: Duration,
    /// Mark the session cookie `Secure` (everything but development)
    pub secure_cookies: bool,
    /// AWS S3 client (venue layout uploads)
    pub s3: S3Client,
    pub upload_s3_bucket: String,
    pub upload_public_base_url: String,
    /// AWS SES client for sending emails
    pub ses: SesClient,
    pub ses_from_email: String,
    /// Front-end base URL for links in emails
    pub app_base_url: String,
}

impl AppState {
    /// Connect the pool, apply migrations if enabled and load AWS clients
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await?;

        if config.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database migrations applied");
        }

        let timeouts = aws_config::timeout::TimeoutConfig::builder()
            .operation_timeout(config.request_timeout)
            .build();
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .timeout_config(timeouts)
            .load()
            .await;

        let ses_config = match std::env::var("SES_REGION") {
            Ok(ses_region) => aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build(),
            Err(_) => aws_config.clone(),
        };

        Ok(Self::from_parts(config, pool, &aws_config, &ses_config))
    }

    /// Assemble state from already-built clients
    pub fn from_parts(
        config: &Config,
        pool: PgPool,
        s3_config: &aws_config::SdkConfig,
        ses_config: &aws_config::SdkConfig,
    ) -> Self {
        Self {
            pool,
            tokens: TokenSigner::new(&config.session_secret, config.session_ttl),
            rate_limiter: RateLimiter::new(),
            login_limit: config.login_limit,
            password_policy: config.password_policy.clone(),
            reset_token_ttl: config.reset_token_ttl,
            secure_cookies: !config.is_development(),
            s3: S3Client::new(s3_config),
            upload_s3_bucket: config.upload_s3_bucket.clone(),
            upload_public_base_url: config.upload_public_base_url.clone(),
            ses: SesClient::new(ses_config),
            ses_from_email: config.ses_from_email.clone(),
            app_base_url: config.app_base_url.clone(),
        }
    }
}
