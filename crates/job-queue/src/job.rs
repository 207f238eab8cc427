use chrono::{DateTime, Utc};
use common::JobId;
use serde::{Deserialize, Serialize};

/// A unit of queued work. Jobs carry no payload beyond their type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub job_type: String,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Creates a job of `job_type` with a fresh ID.
    pub fn new(job_type: impl Into<String>) -> Self {
        Self {
            id: JobId::new(),
            job_type: job_type.into(),
            created_at: Utc::now(),
        }
    }
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    Queued,
    Active,
    Completed,
    Failed,
}

impl JobState {
    /// Returns true once the job has either completed or failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobState::Queued => "Queued",
            JobState::Active => "Active",
            JobState::Completed => "Completed",
            JobState::Failed => "Failed",
        };
        write!(f, "{s}")
    }
}

/// Outcome notification published after a job finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JobEvent {
    Completed {
        job_id: JobId,
        job_type: String,
    },
    Failed {
        job_id: JobId,
        job_type: String,
        error: String,
    },
}

impl JobEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            JobEvent::Completed { job_id, .. } | JobEvent::Failed { job_id, .. } => *job_id,
        }
    }

    pub fn job_type(&self) -> &str {
        match self {
            JobEvent::Completed { job_type, .. } | JobEvent::Failed { job_type, .. } => job_type,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, JobEvent::Completed { .. })
    }
}
