//! Reservation job handler.

use async_trait::async_trait;
use counter_store::CounterStore;
use job_queue::{Job, JobFailure, JobHandler};

use crate::{ReservationError, ReservationGate, Result, SeatCounter};

/// Result of a granted reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationOutcome {
    Granted { remaining: u64 },
}

/// Handles `reserve_seat` jobs by decrementing the seat counter.
///
/// Each job reads the current count `s` and then:
/// 1. closes the gate if `s <= 1`, so no further requests are admitted
///    while the last seat is still being handed out;
/// 2. writes `s - 1` if `s >= 1`;
/// 3. fails with [`ReservationError::InsufficientSeats`] if `s == 0`.
///
/// The gate check runs before the grant check. With one seat left the gate
/// closes and the current job still gets that seat.
#[derive(Clone)]
pub struct ReservationProcessor<S: CounterStore> {
    seats: SeatCounter<S>,
    gate: ReservationGate,
}

impl<S: CounterStore> ReservationProcessor<S> {
    pub fn new(seats: SeatCounter<S>, gate: ReservationGate) -> Self {
        Self { seats, gate }
    }

    /// Attempts to take one seat.
    #[tracing::instrument(skip(self))]
    pub async fn reserve(&self) -> Result<ReservationOutcome> {
        let available = self.seats.read_seats().await?;

        if available <= 1 {
            self.gate.close();
        }

        if available >= 1 {
            let remaining = available - 1;
            self.seats.write_seats(remaining).await?;
            metrics::counter!("reservations_granted_total").increment(1);
            tracing::debug!(remaining, "seat reserved");
            Ok(ReservationOutcome::Granted { remaining })
        } else {
            metrics::counter!("reservations_rejected_total").increment(1);
            Err(ReservationError::InsufficientSeats)
        }
    }
}

#[async_trait]
impl<S: CounterStore> JobHandler for ReservationProcessor<S> {
    async fn handle(&self, job: &Job) -> std::result::Result<(), JobFailure> {
        self.reserve().await.map(|_| ()).map_err(|e| {
            tracing::warn!(job_id = %job.id, error = %e, "seat reservation failed");
            JobFailure::new(e.to_string())
        })
    }
}
