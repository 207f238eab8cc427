//! Counter store for the seat reservation system.
//!
//! The store is a plain key/value service: values are kept as text and every
//! `set` overwrites the previous value for the key (last write wins). There is
//! no compare-and-swap; callers that read-modify-write must serialize
//! themselves.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryCounterStore;
pub use postgres::PostgresCounterStore;
pub use store::CounterStore;
