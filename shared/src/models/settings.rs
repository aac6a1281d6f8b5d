//! Platform-wide fee and subscription settings

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Global settings managed by platform admins (single row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PlatformSettings {
    /// Percentage fee charged on each order (0-100)
    #[serde(with = "rust_decimal::serde::float")]
    pub platform_fee_percent: Decimal,
    /// Fixed fee charged on each order
    #[serde(with = "rust_decimal::serde::float")]
    pub platform_fee_fixed: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subscription_monthly_price: Decimal,
    pub subscription_trial_days: i32,
    pub support_email: String,
    pub maintenance_mode: bool,
    pub updated_at: Option<i64>,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            platform_fee_percent: Decimal::new(5, 0),
            platform_fee_fixed: Decimal::ZERO,
            subscription_monthly_price: Decimal::ZERO,
            subscription_trial_days: 14,
            support_email: "support@example.com".to_string(),
            maintenance_mode: false,
            updated_at: None,
        }
    }
}

impl PlatformSettings {
    /// Overwrite every field present in `update`
    pub fn apply(&mut self, update: &PlatformSettingsUpdate) {
        if let Some(v) = update.platform_fee_percent {
            self.platform_fee_percent = v;
        }
        if let Some(v) = update.platform_fee_fixed {
            self.platform_fee_fixed = v;
        }
        if let Some(v) = update.subscription_monthly_price {
            self.subscription_monthly_price = v;
        }
        if let Some(v) = update.subscription_trial_days {
            self.subscription_trial_days = v;
        }
        if let Some(v) = &update.support_email {
            self.support_email = v.clone();
        }
        if let Some(v) = update.maintenance_mode {
            self.maintenance_mode = v;
        }
    }
}

/// Partial update payload; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlatformSettingsUpdate {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub platform_fee_percent: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub platform_fee_fixed: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub subscription_monthly_price: Option<Decimal>,
    pub subscription_trial_days: Option<i32>,
    pub support_email: Option<String>,
    pub maintenance_mode: Option<bool>,
}

impl PlatformSettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.platform_fee_percent.is_none()
            && self.platform_fee_fixed.is_none()
            && self.subscription_monthly_price.is_none()
            && self.subscription_trial_days.is_none()
            && self.support_email.is_none()
            && self.maintenance_mode.is_none()
    }
}
