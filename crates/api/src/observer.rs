//! Background logging of reservation job outcomes.

use job_queue::JobEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Logs every job outcome received on `events` until the channel closes.
///
/// The HTTP caller has already been answered by the time a job finishes, so
/// this is the only place outcomes surface. Feed it from
/// [`JobQueue::observe`](job_queue::JobQueue::observe) so no outcome is
/// dropped under load.
pub fn spawn_job_logger(mut events: mpsc::UnboundedReceiver<JobEvent>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut logged = 0;
        while let Some(event) = events.recv().await {
            match event {
                JobEvent::Completed { job_id, .. } => {
                    tracing::info!(%job_id, "Seat reservation job {job_id} completed");
                }
                JobEvent::Failed { job_id, error, .. } => {
                    tracing::warn!(%job_id, %error, "Seat reservation job {job_id} failed: {error}");
                }
            }
            logged += 1;
        }
        logged
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use job_queue::{Job, JobFailure, JobHandler, JobQueue};

    struct AlwaysFails;

    #[async_trait]
    impl JobHandler for AlwaysFails {
        async fn handle(&self, _job: &Job) -> Result<(), JobFailure> {
            Err(JobFailure::new("Not enough seats available"))
        }
    }

    #[tokio::test]
    async fn logs_every_outcome_of_a_large_burst() {
        let queue = JobQueue::new();
        let handle = spawn_job_logger(queue.observe().await);

        for _ in 0..5000 {
            queue.enqueue("reserve_seat").await.unwrap();
        }
        queue
            .process("reserve_seat", Arc::new(AlwaysFails))
            .await
            .unwrap();
        // The logger ends once the consumer has drained the burst and the
        // last queue handle is gone.
        queue.close().await;
        drop(queue);

        assert_eq!(handle.await.unwrap(), 5000);
    }
}
