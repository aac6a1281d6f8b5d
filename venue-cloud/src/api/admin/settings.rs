//! Platform fee and subscription settings

use axum::{Extension, Json, extract::State};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{PlatformSettings, PlatformSettingsUpdate};

use crate::api::ApiResult;
use crate::api::json::ApiJson;
use crate::auth::AdminSession;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::{looks_like_email, now_millis};

const MAX_TRIAL_DAYS: i32 = 365;

/// GET /api/admin/settings
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<PlatformSettings> {
    let settings = db::settings::get(&state.pool)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(settings))
}

/// PATCH /api/admin/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    ApiJson(update): ApiJson<PlatformSettingsUpdate>,
) -> ApiResult<PlatformSettings> {
    if update.is_empty() {
        return Err(AppError::invalid_request("No settings provided"));
    }
    validate_update(&update)?;

    let settings = db::settings::update(&state.pool, &update, &admin.user_id, now_millis())
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(admin_id = %admin.user_id, "Platform settings updated");
    Ok(Json(settings))
}

/// Check every provided field; the first violation is returned
pub fn validate_update(update: &PlatformSettingsUpdate) -> Result<(), AppError> {
    if let Some(v) = update.platform_fee_percent
        && (v < Decimal::ZERO || v > Decimal::ONE_HUNDRED)
    {
        return Err(invalid("platformFeePercent", "Platform fee percent must be between 0 and 100"));
    }
    if let Some(v) = update.platform_fee_fixed
        && v < Decimal::ZERO
    {
        return Err(invalid("platformFeeFixed", "Platform fixed fee cannot be negative"));
    }
    if let Some(v) = update.subscription_monthly_price
        && v < Decimal::ZERO
    {
        return Err(invalid(
            "subscriptionMonthlyPrice",
            "Subscription price cannot be negative",
        ));
    }
    if let Some(v) = update.subscription_trial_days
        && !(0..=MAX_TRIAL_DAYS).contains(&v)
    {
        return Err(invalid(
            "subscriptionTrialDays",
            format!("Trial days must be between 0 and {MAX_TRIAL_DAYS}"),
        ));
    }
    if let Some(v) = &update.support_email
        && !looks_like_email(v.trim())
    {
        return Err(invalid("supportEmail", "Support email is not a valid email address"));
    }
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> AppError {
    AppError::with_message(ErrorCode::SettingsInvalid, message).with_detail("field", field)
}
