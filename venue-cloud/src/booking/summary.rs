//! Reduce the table bookings of one order into a customer-facing summary

use rust_decimal::Decimal;
use shared::models::{BookingSummary, EventInfo};

/// Section label used when a booking's section is missing
pub const UNKNOWN_SECTION: &str = "Unknown Section";

/// One table booking joined with its section and event
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct BookingRow {
    pub id: String,
    pub order_id: String,
    pub table_number: Option<String>,
    pub amount: Option<Decimal>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub section_name: Option<String>,
    pub event_id: Option<String>,
    pub event_title: Option<String>,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub event_image: Option<String>,
}

/// Build the order summary. Returns `None` when the order has no bookings.
///
/// The first row stands in for event and customer details. Sections are
/// counted in first-seen order and rendered as `"2x VIP, 1x Terrace"`.
pub fn summarize(order_id: &str, rows: &[BookingRow]) -> Option<BookingSummary> {
    let first = rows.first()?;

    let mut sections: Vec<(&str, usize)> = Vec::new();
    for row in rows {
        let name = row.section_name.as_deref().unwrap_or(UNKNOWN_SECTION);
        match sections.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => sections.push((name, 1)),
        }
    }
    let section_name = sections
        .iter()
        .map(|(name, count)| format!("{count}x {name}"))
        .collect::<Vec<_>>()
        .join(", ");

    let amount = rows
        .iter()
        .map(|r| r.amount.unwrap_or(Decimal::ZERO))
        .sum();

    Some(BookingSummary {
        order_id: order_id.to_string(),
        booking_ids: rows.iter().map(|r| r.id.clone()).collect(),
        event: EventInfo {
            id: first.event_id.clone(),
            title: first.event_title.clone(),
            date: first.event_date.clone(),
            time: first.event_time.clone(),
            location: first.event_location.clone(),
            image: first.event_image.clone(),
        },
        section_name,
        table_numbers: rows
            .iter()
            .map(|r| r.table_number.clone().unwrap_or_default())
            .collect(),
        total_tables: rows.len(),
        amount,
        customer_name: first.customer_name.clone(),
        customer_email: first.customer_email.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, section: Option<&str>, table: &str, amount: Option<i64>) -> BookingRow {
        BookingRow {
            id: id.into(),
            order_id: "ORD1".into(),
            table_number: Some(table.into()),
            amount: amount.map(Decimal::from),
            customer_name: Some("Ada Lovelace".into()),
            customer_email: Some("ada@example.com".into()),
            section_name: section.map(Into::into),
            event_id: Some("evt-1".into()),
            event_title: Some("New Year Gala".into()),
            event_date: Some("2026-12-31".into()),
            event_time: Some("22:00".into()),
            event_location: Some("Main Hall".into()),
            event_image: None,
        }
    }

    #[test]
    fn test_two_vip_tables() {
        let rows = vec![
            row("b1", Some("VIP"), "1", Some(50)),
            row("b2", Some("VIP"), "2", Some(50)),
        ];
        let summary = summarize("ORD1", &rows).unwrap();
        assert_eq!(summary.total_tables, 2);
        assert_eq!(summary.section_name, "2x VIP");
        assert_eq!(summary.amount, Decimal::from(100));
        assert_eq!(summary.booking_ids, vec!["b1", "b2"]);
        assert_eq!(summary.table_numbers, vec!["1", "2"]);
        assert_eq!(summary.event.title.as_deref(), Some("New Year Gala"));
        assert_eq!(summary.customer_email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_no_rows_is_none() {
        assert!(summarize("ORD404", &[]).is_none());
    }

    #[test]
    fn test_sections_keep_first_seen_order() {
        let rows = vec![
            row("b1", Some("Terrace"), "7", Some(20)),
            row("b2", Some("VIP"), "1", Some(50)),
            row("b3", Some("Terrace"), "8", Some(20)),
            row("b4", None, "99", Some(10)),
        ];
        let summary = summarize("ORD1", &rows).unwrap();
        assert_eq!(summary.section_name, "2x Terrace, 1x VIP, 1x Unknown Section");
        assert_eq!(summary.table_numbers, vec!["7", "1", "8", "99"]);
        assert_eq!(summary.total_tables, 4);
    }

    #[test]
    fn test_missing_amount_counts_as_zero() {
        let rows = vec![
            row("b1", Some("VIP"), "1", Some(50)),
            row("b2", Some("VIP"), "2", None),
        ];
        let summary = summarize("ORD1", &rows).unwrap();
        assert_eq!(summary.amount, Decimal::from(50));
    }

    #[test]
    fn test_fractional_amounts_sum_exactly() {
        let mut a = row("b1", Some("VIP"), "1", None);
        a.amount = Some(Decimal::new(1010, 2));
        let mut b = row("b2", Some("VIP"), "2", None);
        b.amount = Some(Decimal::new(2020, 2));
        let summary = summarize("ORD1", &[a, b]).unwrap();
        assert_eq!(summary.amount, Decimal::new(3030, 2));
    }

    #[test]
    fn test_first_row_supplies_customer_details() {
        let mut second = row("b2", Some("VIP"), "2", Some(50));
        second.customer_name = Some("Someone Else".into());
        let rows = vec![row("b1", Some("VIP"), "1", Some(50)), second];
        let summary = summarize("ORD1", &rows).unwrap();
        assert_eq!(summary.customer_name.as_deref(), Some("Ada Lovelace"));
    }
}
