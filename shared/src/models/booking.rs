//! Table booking models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Event metadata shown on the checkout confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

/// Customer-facing summary of every table booked under one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub order_id: String,
    pub booking_ids: Vec<String>,
    pub event: EventInfo,
    /// e.g. `"2x VIP, 1x Terrace"`
    pub section_name: String,
    pub table_numbers: Vec<String>,
    pub total_tables: usize,
    /// Sum of the booked tables, sent as a JSON number
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}
