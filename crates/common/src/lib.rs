//! Shared identifiers and well-known names for the seat reservation system.

mod types;

pub use types::{JobId, RESERVE_SEAT_JOB, SEAT_COUNTER_KEY};
