//! venue-cloud: checkout confirmation, platform admin and password reset API
//!
//! - Aggregates an order's table bookings for the checkout confirmation page
//! - Authenticates platform admins with signed, stateless session tokens
//! - Issues and redeems one-time password reset tokens
//! - Throttles login and reset attempts in process memory
//! - Stores venue layout uploads in S3

pub mod api;
pub mod auth;
pub mod booking;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod state;
pub mod util;

pub use config::Config;
pub use state::AppState;
