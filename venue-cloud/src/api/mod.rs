//! API routes for venue-cloud

pub mod admin;
pub mod checkout;
pub mod health;
mod json;
pub mod password;
pub mod upload;

pub use json::ApiJson;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::{Json, Router, middleware};
use http::{HeaderName, HeaderValue, StatusCode};
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth::{admin_forbidden_middleware, admin_session_middleware};
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build the full application router with middleware and state
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    // Platform admin API (session cookie or Bearer token)
    let admin = Router::new()
        .route("/api/admin/session", get(admin::session))
        .route(
            "/api/admin/settings",
            get(admin::get_settings).patch(admin::update_settings),
        )
        .route("/api/admin/login-logs", get(admin::list_login_logs))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_session_middleware,
        ));

    // Invitation management answers a missing session with 403
    let invitations = Router::new()
        .route("/api/admin/invitations/{id}", delete(admin::delete_invitation))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_forbidden_middleware,
        ));

    // Public routes
    let public = Router::new()
        .route("/api/checkout/get-table-booking", get(checkout::get_table_booking))
        .route("/api/checkout/send-confirmation", post(checkout::send_confirmation))
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", post(admin::logout))
        .route("/api/auth/forgot-password", post(password::forgot_password))
        .route("/api/auth/reset-password", post(password::reset_password));

    // Layout uploads need a larger body limit
    let uploads = Router::new()
        .route("/api/upload/venue-layout", post(upload::upload_venue_layout))
        .layer(DefaultBodyLimit::max(upload::MAX_LAYOUT_SIZE + MULTIPART_OVERHEAD));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(admin)
        .merge(invitations)
        .merge(uploads)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Last added runs first: the id is set, then copied onto the response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}
