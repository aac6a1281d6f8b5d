//! Admin login, logout and session lookup

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use http::{HeaderMap, header};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::{AdminUser, LoginStatus};

use crate::api::json::{ApiJson, required};
use crate::auth::ClientIp;
use crate::auth::session::{AdminSession, clear_session_cookie, session_cookie};
use crate::db;
use crate::db::login_logs::NewLoginLog;
use crate::db::users::UserRow;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::{now_millis, verify_password_or_dummy};

/// Rate limiter action shared by the per-IP and per-email login budgets
pub const LOGIN_ACTION: &str = "admin_login";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: AdminUser,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Response, AppError> {
    let (Some(email), Some(password)) = (
        required(req.email),
        req.password.filter(|p| !p.trim().is_empty()),
    ) else {
        return Err(AppError::invalid_request("Email and password are required"));
    };
    let email = email.to_lowercase();
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    for identity in [format!("ip:{ip}"), format!("email:{email}")] {
        let outcome = state
            .rate_limiter
            .attempt(&identity, LOGIN_ACTION, &state.login_limit)
            .await;
        if !outcome.success {
            tracing::warn!(ip = %ip, email = %email, reset_in = outcome.reset_in, "Admin login rate limited");
            record_attempt(&state, &email, None, &ip, user_agent, LoginStatus::RateLimited).await;
            return Err(AppError::too_many_attempts(outcome.reset_in));
        }
    }

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(ServiceError::from)?;

    let admin = tokio::task::spawn_blocking(move || check_admin_credentials(user, &password))
        .await
        .map_err(|e| {
            tracing::error!("spawn_blocking join error: {e}");
            AppError::internal()
        })?;

    let Some(admin) = admin else {
        tracing::warn!(ip = %ip, email = %email, "Admin login failed");
        record_attempt(&state, &email, None, &ip, user_agent, LoginStatus::Failed).await;
        return Err(AppError::invalid_credentials());
    };

    let session = AdminSession {
        user_id: admin.id,
        email: admin.email,
        name: admin.name,
    };
    let token = state.tokens.issue_session(&session).map_err(|e| {
        tracing::error!("Session token creation failed: {e}");
        AppError::internal()
    })?;

    record_attempt(
        &state,
        &email,
        Some(&session.user_id),
        &ip,
        user_agent,
        LoginStatus::Success,
    )
    .await;
    tracing::info!(ip = %ip, user_id = %session.user_id, "Admin logged in");

    let cookie = session_cookie(&token, state.tokens.session_ttl(), state.secure_cookies);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            user: session.into(),
        }),
    )
        .into_response())
}

/// The only place that decides whether a login succeeds.
///
/// Unknown email, non-admin account and wrong password all come out as
/// `None`, and each path performs exactly one argon2 verification.
pub(crate) fn check_admin_credentials(user: Option<UserRow>, password: &str) -> Option<UserRow> {
    let hash = user
        .as_ref()
        .filter(|u| u.is_platform_admin)
        .map(|u| u.password_hash.as_str());
    if verify_password_or_dummy(password, hash) {
        user
    } else {
        None
    }
}

async fn record_attempt(
    state: &AppState,
    email: &str,
    user_id: Option<&str>,
    ip: &str,
    user_agent: Option<&str>,
    status: LoginStatus,
) {
    let entry = NewLoginLog {
        email,
        user_id,
        ip_address: ip,
        user_agent,
        status,
    };
    if let Err(e) = db::login_logs::insert(&state.pool, &entry, now_millis()).await {
        tracing::warn!(error = %e, "Failed to write admin login log");
    }
}

/// POST /api/admin/logout
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies))],
        Json(serde_json::json!({ "success": true })),
    )
        .into_response()
}

/// GET /api/admin/session
pub async fn session(Extension(session): Extension<AdminSession>) -> Json<serde_json::Value> {
    let user: AdminUser = session.into();
    Json(serde_json::json!({ "user": user }))
}
