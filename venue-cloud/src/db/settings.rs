//! Platform settings (single row, id = 1)

use shared::models::PlatformSettings;
use sqlx::PgPool;

use crate::error::BoxError;

const SELECT_SETTINGS: &str = "SELECT platform_fee_percent, platform_fee_fixed, \
     subscription_monthly_price, subscription_trial_days, support_email, \
     maintenance_mode, updated_at FROM platform_settings WHERE id = 1";

/// Current settings, or the defaults when the row has never been written
pub async fn get(pool: &PgPool) -> Result<PlatformSettings, BoxError> {
    let row: Option<PlatformSettings> = sqlx::query_as(SELECT_SETTINGS).fetch_optional(pool).await?;
    Ok(row.unwrap_or_default())
}

/// Apply `update` on top of the stored row under a row lock and persist it
pub async fn update(
    pool: &PgPool,
    update: &shared::models::PlatformSettingsUpdate,
    updated_by: &str,
    now: i64,
) -> Result<PlatformSettings, BoxError> {
    let mut tx = pool.begin().await?;

    let current: Option<PlatformSettings> =
        sqlx::query_as(&format!("{SELECT_SETTINGS} FOR UPDATE"))
            .fetch_optional(&mut *tx)
            .await?;
    let mut settings = current.unwrap_or_default();
    settings.apply(update);
    settings.updated_at = Some(now);

    sqlx::query(
        "INSERT INTO platform_settings (id, platform_fee_percent, platform_fee_fixed, \
             subscription_monthly_price, subscription_trial_days, support_email, \
             maintenance_mode, updated_by, updated_at) \
         VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (id) DO UPDATE SET \
             platform_fee_percent = EXCLUDED.platform_fee_percent, \
             platform_fee_fixed = EXCLUDED.platform_fee_fixed, \
             subscription_monthly_price = EXCLUDED.subscription_monthly_price, \
             subscription_trial_days = EXCLUDED.subscription_trial_days, \
             support_email = EXCLUDED.support_email, \
             maintenance_mode = EXCLUDED.maintenance_mode, \
             updated_by = EXCLUDED.updated_by, \
             updated_at = EXCLUDED.updated_at",
    )
    .bind(settings.platform_fee_percent)
    .bind(settings.platform_fee_fixed)
    .bind(settings.subscription_monthly_price)
    .bind(settings.subscription_trial_days)
    .bind(&settings.support_email)
    .bind(settings.maintenance_mode)
    .bind(updated_by)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(settings)
}
