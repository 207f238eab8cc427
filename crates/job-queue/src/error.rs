use thiserror::Error;

/// Errors returned by queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue has been closed and accepts no more jobs.
    #[error("Job queue is closed")]
    Closed,

    /// The queue refused to accept a job.
    #[error("Failed to enqueue job of type '{job_type}': {reason}")]
    EnqueueRejected { job_type: String, reason: String },

    /// A consumer is already processing this job type.
    #[error("A consumer is already registered for job type '{0}'")]
    ConsumerAlreadyRegistered(String),
}

/// Result type for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;
