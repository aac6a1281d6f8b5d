//! Table booking queries

use sqlx::PgPool;

use crate::booking::BookingRow;
use crate::error::BoxError;

/// All bookings of an order with section and event joined, oldest first
pub async fn find_by_order(pool: &PgPool, order_id: &str) -> Result<Vec<BookingRow>, BoxError> {
    let rows: Vec<BookingRow> = sqlx::query_as(
        "SELECT tb.id, tb.order_id, tb.table_number, tb.amount, \
                tb.customer_name, tb.customer_email, \
                s.name AS section_name, \
                e.id AS event_id, e.title AS event_title, e.date AS event_date, \
                e.time AS event_time, e.location AS event_location, e.image_url AS event_image \
         FROM table_bookings tb \
         LEFT JOIN sections s ON s.id = tb.section_id \
         LEFT JOIN events e ON e.id = tb.event_id \
         WHERE tb.order_id = $1 \
         ORDER BY tb.created_at, tb.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
