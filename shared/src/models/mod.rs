//! Data models shared between the service and its clients

pub mod admin;
pub mod booking;
pub mod settings;

pub use admin::{AdminUser, LoginStatus};
pub use booking::{BookingSummary, EventInfo};
pub use settings::{PlatformSettings, PlatformSettingsUpdate};
