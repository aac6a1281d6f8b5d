//! Customer checkout endpoints: booking lookup and confirmation email

use std::time::Duration;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::BookingSummary;

use super::ApiResult;
use super::json::{ApiJson, required};
use crate::auth::RateLimitConfig;
use crate::booking::summarize;
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

/// Confirmation emails per order
const CONFIRMATION_LIMIT: RateLimitConfig = RateLimitConfig {
    max_attempts: 3,
    window: Duration::from_secs(60 * 60),
};
const CONFIRMATION_ACTION: &str = "booking_confirmation";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub order_id: Option<String>,
}

/// GET /api/checkout/get-table-booking?orderId=
pub async fn get_table_booking(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> ApiResult<BookingSummary> {
    let order_id =
        required(query.order_id).ok_or_else(|| AppError::invalid_request("orderId is required"))?;

    Ok(Json(load_summary(&state, &order_id).await?))
}

async fn load_summary(state: &AppState, order_id: &str) -> ServiceResult<BookingSummary> {
    let rows = db::bookings::find_by_order(&state.pool, order_id).await?;
    summarize(order_id, &rows).ok_or_else(|| AppError::new(ErrorCode::BookingNotFound).into())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConfirmationRequest {
    pub order_id: Option<String>,
}

/// POST /api/checkout/send-confirmation
pub async fn send_confirmation(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendConfirmationRequest>,
) -> ApiResult<serde_json::Value> {
    let order_id =
        required(req.order_id).ok_or_else(|| AppError::invalid_request("orderId is required"))?;

    let outcome = state
        .rate_limiter
        .attempt(&order_id, CONFIRMATION_ACTION, &CONFIRMATION_LIMIT)
        .await;
    if !outcome.success {
        tracing::warn!(order_id = %order_id, "Booking confirmation rate limited");
        return Err(AppError::too_many_attempts(outcome.reset_in));
    }

    let summary = load_summary(&state, &order_id).await?;
    let to = summary
        .customer_email
        .clone()
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::invalid_request("Booking has no customer email"))?;

    crate::email::send_booking_confirmation(&state.ses, &state.ses_from_email, &to, &summary)
        .await
        .map_err(ServiceError::Email)?;

    Ok(Json(serde_json::json!({ "success": true })))
}
