//! Admission gate for new reservation requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared open/closed flag deciding whether new reservation jobs may be
/// enqueued.
///
/// Starts closed. Clones share the same flag, so one handle can be given to
/// the HTTP layer and another to the processor.
#[derive(Debug, Clone, Default)]
pub struct ReservationGate {
    open: Arc<AtomicBool>,
}

impl ReservationGate {
    /// Creates a closed gate.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn open(&self) {
        if !self.open.swap(true, Ordering::SeqCst) {
            tracing::info!("reservations opened");
        }
    }

    pub fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            tracing::info!("reservations blocked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        assert!(!ReservationGate::new().is_open());
    }

    #[test]
    fn open_and_close_are_shared_between_clones() {
        let gate = ReservationGate::new();
        let other = gate.clone();

        gate.open();
        assert!(other.is_open());

        other.close();
        assert!(!gate.is_open());
    }

    #[test]
    fn repeated_calls_are_harmless() {
        let gate = ReservationGate::new();
        gate.open();
        gate.open();
        assert!(gate.is_open());
        gate.close();
        gate.close();
        assert!(!gate.is_open());
    }
}
