//! Password reset endpoints: forgot-password, reset-password

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use super::ApiResult;
use super::json::{ApiJson, required};
use crate::auth::ClientIp;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::{hash_password, looks_like_email, now_millis};

/// Rate limiter action for reset requests (per IP and per email)
pub const PASSWORD_RESET_ACTION: &str = "password_reset";

const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account exists for that email, a password reset link has been sent";

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// POST /api/auth/forgot-password
///
/// Answers the same way whether or not the account exists.
pub async fn forgot_password(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let email = required(req.email)
        .map(|e| e.to_lowercase())
        .filter(|e| looks_like_email(e))
        .ok_or_else(|| AppError::invalid_request("A valid email is required"))?;

    for identity in [format!("ip:{ip}"), format!("email:{email}")] {
        let outcome = state
            .rate_limiter
            .attempt(&identity, PASSWORD_RESET_ACTION, &state.login_limit)
            .await;
        if !outcome.success {
            tracing::warn!(ip = %ip, email = %email, "Password reset request rate limited");
            return Err(AppError::too_many_attempts(outcome.reset_in));
        }
    }

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(ServiceError::from)?;

    if let Some(user) = user {
        match state
            .tokens
            .issue_reset_token(&user.id, &user.email, state.reset_token_ttl)
        {
            Ok(token) => {
                let link = format!("{}/reset-password?token={token}", state.app_base_url);
                let valid_minutes = state.reset_token_ttl.as_secs() / 60;
                let (ses, from) = (state.ses.clone(), state.ses_from_email.clone());
                // Not awaited: response time must not depend on the account existing
                tokio::spawn(async move {
                    if let Err(e) = crate::email::send_password_reset_link(
                        &ses,
                        &from,
                        &user.email,
                        &link,
                        valid_minutes,
                    )
                    .await
                    {
                        tracing::error!(user_id = %user.id, error = %e, "Failed to send password reset email");
                    }
                });
            }
            Err(e) => tracing::error!(user_id = %user.id, "Reset token creation failed: {e}"),
        }
    } else {
        tracing::debug!(ip = %ip, "Password reset requested for unknown email");
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": FORGOT_PASSWORD_MESSAGE,
    })))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let (Some(token), Some(password)) = (
        required(req.token),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::invalid_request("Token and password are required"));
    };

    let policy = &state.password_policy;
    policy.check(&password).map_err(|message| {
        AppError::with_message(ErrorCode::WeakPassword, message)
            .with_detail("requirements", policy.summary())
    })?;

    let grant = state
        .tokens
        .verify_reset_token(&token)
        .ok_or_else(|| AppError::new(ErrorCode::InvalidOrExpiredToken))?;

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!("spawn_blocking join error: {e}");
            AppError::internal()
        })?
        .map_err(|e| {
            tracing::error!("Password hashing failed: {e}");
            AppError::internal()
        })?;

    let consumed = db::reset_tokens::consume_and_set_password(
        &state.pool,
        &grant.jti,
        &grant.user_id,
        &password_hash,
        now_millis(),
    )
    .await
    .map_err(ServiceError::from)?;

    if !consumed {
        tracing::warn!(user_id = %grant.user_id, "Reset token reuse rejected");
        return Err(AppError::new(ErrorCode::InvalidOrExpiredToken));
    }

    tracing::info!(user_id = %grant.user_id, "Password reset completed");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Password has been reset successfully",
    })))
}
