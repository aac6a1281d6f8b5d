//! Admin session middleware for the platform admin API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};

use super::session::{AdminSession, token_from_headers};
use crate::state::AppState;

/// Verify the admin session from the `Authorization` header or session cookie.
/// Missing or invalid sessions are answered with 401.
pub async fn admin_session_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    require_session(&state, request, next, AppError::unauthorized()).await
}

/// Same check, but reported as 403 Forbidden. Used by routes whose clients
/// treat a missing session as a permission failure (invitation management).
pub async fn admin_forbidden_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    require_session(&state, request, next, AppError::new(ErrorCode::AdminRequired)).await
}

async fn require_session(
    state: &AppState,
    mut request: Request,
    next: Next,
    rejection: AppError,
) -> Response {
    let session: Option<AdminSession> =
        token_from_headers(request.headers()).and_then(|token| state.tokens.verify_session(token));

    match session {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => rejection.into_response(),
    }
}
