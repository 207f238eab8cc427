//! Startup seeding of the seat counter.

use counter_store::CounterStore;

use crate::{ReservationError, ReservationGate, Result, SeatCounter};

/// Seat count used when none is configured.
pub const DEFAULT_INITIAL_SEATS: u64 = 50;

/// Resets the seat counter to `initial_seats` and opens the gate.
///
/// The gate is opened only after the write succeeds. On failure it is left
/// as it was (closed on a fresh process) and nothing retries.
#[tracing::instrument(skip(seats, gate))]
pub async fn initialize<S: CounterStore>(
    seats: &SeatCounter<S>,
    gate: &ReservationGate,
    initial_seats: u64,
) -> Result<()> {
    seats
        .write_seats(initial_seats)
        .await
        .map_err(|e| ReservationError::Initialization(Box::new(e)))?;
    gate.open();
    tracing::info!(initial_seats, "available seats initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use counter_store::InMemoryCounterStore;

    #[tokio::test]
    async fn seeds_counter_then_opens_gate() {
        let seats = SeatCounter::new(InMemoryCounterStore::new());
        let gate = ReservationGate::new();

        initialize(&seats, &gate, DEFAULT_INITIAL_SEATS).await.unwrap();

        assert_eq!(seats.read_seats().await.unwrap(), 50);
        assert!(gate.is_open());
    }

    #[tokio::test]
    async fn overwrites_previous_count() {
        let seats = SeatCounter::new(InMemoryCounterStore::new());
        seats.write_seats(3).await.unwrap();
        let gate = ReservationGate::new();

        initialize(&seats, &gate, 10).await.unwrap();
        assert_eq!(seats.read_seats().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn failed_write_keeps_gate_closed() {
        let store = InMemoryCounterStore::new();
        store.set_unavailable(true);
        let seats = SeatCounter::new(store);
        let gate = ReservationGate::new();

        let result = initialize(&seats, &gate, 50).await;
        assert!(matches!(result, Err(ReservationError::Initialization(_))));
        assert!(!gate.is_open());
    }
}
