//! Database access layer

pub mod bookings;
pub mod invitations;
pub mod login_logs;
pub mod reset_tokens;
pub mod settings;
pub mod users;
