//! Asynchronous job queue for the seat reservation system.
//!
//! Jobs are enqueued by type and buffered in FIFO order until a consumer is
//! registered for that type with [`JobQueue::process`]. Each job type gets
//! exactly one consumer, which handles jobs strictly one at a time. Job
//! outcomes are published as [`JobEvent`]s to every subscriber.

pub mod error;
pub mod handler;
pub mod job;
pub mod queue;

pub use error::{QueueError, Result};
pub use handler::{JobFailure, JobHandler};
pub use job::{Job, JobEvent, JobState};
pub use queue::{JobQueue, QueueStats};
