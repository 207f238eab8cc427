//! Seat reservation core.
//!
//! - [`ReservationGate`]: admission flag checked before a reservation job is
//!   enqueued
//! - [`SeatCounter`]: typed access to the seat count held in a counter store
//! - [`ReservationProcessor`]: job handler that decrements the seat count
//! - [`initialize`]: startup routine that seeds the counter and opens the gate
//!
//! The processor does a plain read-check-write against the store. It relies
//! on the job queue running a single consumer per job type; two processors
//! draining the same seat counter concurrently would lose updates.

pub mod error;
pub mod gate;
pub mod init;
pub mod processor;
pub mod seats;

pub use error::{ReservationError, Result};
pub use gate::ReservationGate;
pub use init::{DEFAULT_INITIAL_SEATS, initialize};
pub use processor::{ReservationOutcome, ReservationProcessor};
pub use seats::SeatCounter;
