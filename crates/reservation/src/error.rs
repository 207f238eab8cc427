//! Reservation error types.

use counter_store::StoreError;
use thiserror::Error;

/// Errors that can occur while reading, reserving or initializing seats.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// The counter store failed or could not be reached.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored seat count is not a non-negative integer.
    #[error("Invalid seat count in store: {value:?}")]
    InvalidSeatValue { value: String },

    /// No seats are left to grant.
    #[error("Not enough seats available")]
    InsufficientSeats,

    /// Seeding the initial seat count failed.
    #[error("Failed to initialize available seats: {0}")]
    Initialization(#[source] Box<ReservationError>),
}

/// Convenience type alias for reservation results.
pub type Result<T> = std::result::Result<T, ReservationError>;
