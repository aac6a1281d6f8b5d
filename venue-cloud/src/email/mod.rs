//! Transactional email via AWS SES

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use shared::models::BookingSummary;

use crate::error::BoxError;

async fn send_text(
    ses: &SesClient,
    from: &str,
    to: &str,
    subject: &str,
    body_text: String,
) -> Result<(), BoxError> {
    let subject = Content::builder().data(subject).build()?;

    let body = Body::builder()
        .text(Content::builder().data(body_text).build()?)
        .build();

    let message = Message::builder().subject(subject).body(body).build();

    ses.send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await?;
    Ok(())
}

pub async fn send_password_reset_link(
    ses: &SesClient,
    from: &str,
    to: &str,
    link: &str,
    valid_minutes: u64,
) -> Result<(), BoxError> {
    let body_text = format!(
        "We received a request to reset your password.\n\n\
         Open this link to choose a new one:\n{link}\n\n\
         The link is valid for {valid_minutes} minutes and can be used once.\n\
         If you did not ask for this, you can ignore this email."
    );
    send_text(ses, from, to, "Reset your password", body_text).await?;

    tracing::info!(to = to, "Password reset link sent");
    Ok(())
}

pub async fn send_booking_confirmation(
    ses: &SesClient,
    from: &str,
    to: &str,
    summary: &BookingSummary,
) -> Result<(), BoxError> {
    let subject = match summary.event.title.as_deref() {
        Some(title) => format!("Your table booking for {title}"),
        None => "Your table booking".to_string(),
    };
    send_text(ses, from, to, &subject, booking_confirmation_text(summary)).await?;

    tracing::info!(to = to, order_id = %summary.order_id, "Booking confirmation sent");
    Ok(())
}

/// Plain-text body of the booking confirmation
pub fn booking_confirmation_text(summary: &BookingSummary) -> String {
    let mut lines = Vec::new();
    match summary.customer_name.as_deref() {
        Some(name) => lines.push(format!("Hi {name},")),
        None => lines.push("Hi,".to_string()),
    }
    lines.push(String::new());
    lines.push("Your table booking is confirmed.".to_string());
    lines.push(String::new());
    lines.push(format!("Order: {}", summary.order_id));
    if let Some(title) = &summary.event.title {
        lines.push(format!("Event: {title}"));
    }
    match (&summary.event.date, &summary.event.time) {
        (Some(date), Some(time)) => lines.push(format!("When: {date} {time}")),
        (Some(date), None) => lines.push(format!("When: {date}")),
        _ => {}
    }
    if let Some(location) = &summary.event.location {
        lines.push(format!("Where: {location}"));
    }
    lines.push(format!("Tables: {}", summary.section_name));
    if !summary.table_numbers.is_empty() {
        lines.push(format!("Table numbers: {}", summary.table_numbers.join(", ")));
    }
    lines.push(format!("Total: {:.2}", summary.amount));
    lines.join("\n")
}
