//! Integration tests for consumer ordering and serialization.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::JobId;
use job_queue::{Job, JobFailure, JobHandler, JobQueue};
use tokio::sync::Mutex;

/// Records handled jobs and the peak number of concurrent invocations.
#[derive(Default)]
struct RecordingHandler {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    handled: Mutex<Vec<JobId>>,
}

#[async_trait]
impl JobHandler for RecordingHandler {
    async fn handle(&self, job: &Job) -> Result<(), JobFailure> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(2)).await;
        self.handled.lock().await.push(job.id);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn jobs_are_handled_one_at_a_time_in_fifo_order() {
    let queue = JobQueue::new();
    let mut events = queue.subscribe();
    let handler = Arc::new(RecordingHandler::default());

    let mut expected = Vec::new();
    for _ in 0..5 {
        expected.push(queue.enqueue("work").await.unwrap());
    }
    queue.process("work", handler.clone()).await.unwrap();

    // Enqueue more while the consumer is already running.
    let producers: Vec<_> = (0..5)
        .map(|_| {
            let queue = queue.clone();
            tokio::spawn(async move { queue.enqueue("work").await.unwrap() })
        })
        .collect();
    for producer in producers {
        producer.await.unwrap();
    }

    for _ in 0..10 {
        assert!(events.recv().await.unwrap().is_completed());
    }

    assert_eq!(handler.max_in_flight.load(Ordering::SeqCst), 1);
    let handled = handler.handled.lock().await;
    assert_eq!(handled.len(), 10);
    assert_eq!(&handled[..5], expected.as_slice());
}

#[tokio::test]
async fn job_types_are_isolated() {
    let queue = JobQueue::new();
    let mut events = queue.subscribe();
    let handler = Arc::new(RecordingHandler::default());

    queue.enqueue("ignored").await.unwrap();
    let id = queue.enqueue("work").await.unwrap();
    queue.process("work", handler.clone()).await.unwrap();

    let event = events.recv().await.unwrap();
    assert_eq!(event.job_id(), id);

    let stats = queue.stats().await;
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.queued, 1);
}

#[tokio::test]
async fn close_drains_buffered_jobs() {
    let queue = JobQueue::new();
    let mut events = queue.subscribe();
    let handler = Arc::new(RecordingHandler::default());

    queue.enqueue("work").await.unwrap();
    queue.enqueue("work").await.unwrap();
    queue.process("work", handler.clone()).await.unwrap();
    queue.close().await;

    for _ in 0..2 {
        assert!(events.recv().await.unwrap().is_completed());
    }
    assert_eq!(handler.handled.lock().await.len(), 2);
}
