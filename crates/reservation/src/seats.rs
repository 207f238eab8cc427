//! Typed access to the seat counter.

use common::SEAT_COUNTER_KEY;
use counter_store::CounterStore;

use crate::{ReservationError, Result};

/// Reads and writes the number of available seats in a [`CounterStore`].
#[derive(Clone)]
pub struct SeatCounter<S: CounterStore> {
    store: S,
}

impl<S: CounterStore> SeatCounter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the number of available seats.
    ///
    /// A counter that was never set reads as 0.
    pub async fn read_seats(&self) -> Result<u64> {
        match self.store.get(SEAT_COUNTER_KEY).await? {
            None => Ok(0),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ReservationError::InvalidSeatValue { value: raw }),
        }
    }

    /// Overwrites the number of available seats.
    pub async fn write_seats(&self, seats: u64) -> Result<()> {
        self.store.set(SEAT_COUNTER_KEY, seats.to_string()).await?;
        metrics::gauge!("available_seats").set(seats as f64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counter_store::{InMemoryCounterStore, StoreError};

    #[tokio::test]
    async fn unset_counter_reads_as_zero() {
        let seats = SeatCounter::new(InMemoryCounterStore::new());
        assert_eq!(seats.read_seats().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn write_then_read() {
        let store = InMemoryCounterStore::new();
        let seats = SeatCounter::new(store.clone());
        seats.write_seats(42).await.unwrap();

        assert_eq!(seats.read_seats().await.unwrap(), 42);
        assert_eq!(
            store.get(SEAT_COUNTER_KEY).await.unwrap().as_deref(),
            Some("42")
        );
    }

    #[tokio::test]
    async fn non_numeric_value_is_invalid() {
        let store = InMemoryCounterStore::new();
        store
            .set(SEAT_COUNTER_KEY, "lots".to_string())
            .await
            .unwrap();
        let seats = SeatCounter::new(store);

        match seats.read_seats().await {
            Err(ReservationError::InvalidSeatValue { value }) => assert_eq!(value, "lots"),
            other => panic!("expected InvalidSeatValue, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn negative_value_is_invalid() {
        let store = InMemoryCounterStore::new();
        store.set(SEAT_COUNTER_KEY, "-1".to_string()).await.unwrap();
        let seats = SeatCounter::new(store);

        assert!(matches!(
            seats.read_seats().await,
            Err(ReservationError::InvalidSeatValue { .. })
        ));
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_store_error() {
        let store = InMemoryCounterStore::new();
        store.set_unavailable(true);
        let seats = SeatCounter::new(store);

        assert!(matches!(
            seats.read_seats().await,
            Err(ReservationError::Store(StoreError::Unavailable(_)))
        ));
        assert!(matches!(
            seats.write_seats(1).await,
            Err(ReservationError::Store(StoreError::Unavailable(_)))
        ));
    }
}
