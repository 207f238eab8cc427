use async_trait::async_trait;
use thiserror::Error;

use crate::Job;

/// Reason a job handler gave for failing a job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct JobFailure {
    pub message: String,
}

impl JobFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Consumer of jobs of a single type.
///
/// `Ok(())` marks the job completed, `Err` marks it failed. The queue never
/// calls `handle` concurrently for the same job type.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &Job) -> Result<(), JobFailure>;
}
