//! Shared types for the venue platform
//!
//! Error codes, the API error envelope and the booking/settings models used
//! by `venue-cloud` and by any Rust client of its API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
