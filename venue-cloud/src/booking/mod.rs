//! Order lookup and aggregation behind checkout confirmation

mod summary;

pub use summary::{BookingRow, UNKNOWN_SECTION, summarize};
