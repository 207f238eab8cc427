use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use common::JobId;
use futures_util::FutureExt;
use tokio::sync::{Mutex, RwLock, broadcast, mpsc};

use crate::{Job, JobEvent, JobHandler, JobState, QueueError, Result};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Per-job-type buffer. The receiver is handed to the consumer on
/// registration, so `receiver.is_none()` means a consumer exists.
struct Lane {
    sender: mpsc::UnboundedSender<Job>,
    receiver: Option<mpsc::UnboundedReceiver<Job>>,
}

impl Lane {
    fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Some(receiver),
        }
    }
}

struct Inner {
    lanes: Mutex<HashMap<String, Lane>>,
    /// Queued and active jobs only; entries are removed once a job finishes.
    pending: RwLock<HashMap<JobId, JobState>>,
    completed: AtomicUsize,
    failed: AtomicUsize,
    events: broadcast::Sender<JobEvent>,
    observers: Mutex<Vec<mpsc::UnboundedSender<JobEvent>>>,
    closed: AtomicBool,
    fail_on_enqueue: AtomicBool,
}

/// Snapshot of job counts by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub queued: usize,
    pub active: usize,
    pub completed: usize,
    pub failed: usize,
}

/// In-process job queue. Clones share the same queue.
#[derive(Clone)]
pub struct JobQueue {
    inner: Arc<Inner>,
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueue {
    /// Creates a new, open queue with no consumers.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                lanes: Mutex::new(HashMap::new()),
                pending: RwLock::new(HashMap::new()),
                completed: AtomicUsize::new(0),
                failed: AtomicUsize::new(0),
                events,
                observers: Mutex::new(Vec::new()),
                closed: AtomicBool::new(false),
                fail_on_enqueue: AtomicBool::new(false),
            }),
        }
    }

    /// Configures the queue to reject enqueues.
    pub fn set_fail_on_enqueue(&self, fail: bool) {
        self.inner.fail_on_enqueue.store(fail, Ordering::SeqCst);
    }

    /// Subscribes to job outcome events.
    ///
    /// Only events published after the call are received. A subscriber that
    /// falls more than the channel capacity behind misses events; use
    /// [`observe`](Self::observe) when every outcome must be seen.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.inner.events.subscribe()
    }

    /// Registers an observer that receives every job outcome published after
    /// the call, without loss. The observer is dropped once its receiver is.
    pub async fn observe(&self) -> mpsc::UnboundedReceiver<JobEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.observers.lock().await.push(tx);
        rx
    }

    /// Adds a job of `job_type` to the back of its queue.
    #[tracing::instrument(skip(self))]
    pub async fn enqueue(&self, job_type: &str) -> Result<JobId> {
        // Checked under the lanes lock so a concurrent `close` can't strand
        // the job in a lane that nobody drains.
        let mut lanes = self.inner.lanes.lock().await;
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(QueueError::Closed);
        }
        if self.inner.fail_on_enqueue.load(Ordering::SeqCst) {
            return Err(QueueError::EnqueueRejected {
                job_type: job_type.to_string(),
                reason: "queue backend unavailable".to_string(),
            });
        }

        let job = Job::new(job_type);
        let job_id = job.id;
        let lane = lanes.entry(job_type.to_string()).or_insert_with(Lane::new);

        self.inner
            .pending
            .write()
            .await
            .insert(job_id, JobState::Queued);

        if lane.sender.send(job).is_err() {
            self.inner.pending.write().await.remove(&job_id);
            return Err(QueueError::Closed);
        }

        metrics::counter!("jobs_enqueued_total", "job_type" => job_type.to_string()).increment(1);
        tracing::debug!(%job_id, "job enqueued");

        Ok(job_id)
    }

    /// Registers `handler` as the consumer for `job_type` and starts draining
    /// its queue, one job at a time, in a background task.
    ///
    /// Jobs enqueued before registration are processed first, in order. Only
    /// one consumer may exist per job type.
    #[tracing::instrument(skip(self, handler))]
    pub async fn process(&self, job_type: &str, handler: Arc<dyn JobHandler>) -> Result<()> {
        let mut receiver = {
            let mut lanes = self.inner.lanes.lock().await;
            if self.inner.closed.load(Ordering::SeqCst) {
                return Err(QueueError::Closed);
            }
            let lane = lanes.entry(job_type.to_string()).or_insert_with(Lane::new);
            lane.receiver
                .take()
                .ok_or_else(|| QueueError::ConsumerAlreadyRegistered(job_type.to_string()))?
        };

        let inner = Arc::clone(&self.inner);
        let consumer_type = job_type.to_string();
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                inner.run_job(job, handler.as_ref()).await;
            }
            tracing::info!(job_type = %consumer_type, "consumer stopped");
        });

        tracing::info!("consumer registered");
        Ok(())
    }

    /// Returns the state of a job that is still queued or active.
    ///
    /// Finished jobs are forgotten; their outcome is reported through
    /// [`subscribe`](Self::subscribe) and [`observe`](Self::observe).
    pub async fn job_state(&self, job_id: JobId) -> Option<JobState> {
        self.inner.pending.read().await.get(&job_id).copied()
    }

    /// Returns the number of jobs still queued or active.
    pub async fn pending_jobs(&self) -> usize {
        self.inner.pending.read().await.len()
    }

    /// Returns job counts by state.
    pub async fn stats(&self) -> QueueStats {
        let pending = self.inner.pending.read().await;
        let active = pending
            .values()
            .filter(|state| **state == JobState::Active)
            .count();
        QueueStats {
            queued: pending.len() - active,
            active,
            completed: self.inner.completed.load(Ordering::SeqCst),
            failed: self.inner.failed.load(Ordering::SeqCst),
        }
    }

    /// Stops accepting jobs.
    ///
    /// Consumers finish the jobs already buffered and then exit. Jobs buffered
    /// for a type that never got a consumer are failed.
    pub async fn close(&self) {
        let mut lanes = self.inner.lanes.lock().await;
        self.inner.closed.store(true, Ordering::SeqCst);

        // Dropping the senders ends each consumer loop once its buffer drains.
        for (_, lane) in lanes.drain() {
            if let Some(mut receiver) = lane.receiver {
                receiver.close();
                while let Ok(job) = receiver.try_recv() {
                    self.inner
                        .finish(job, Err("job queue closed".to_string()))
                        .await;
                }
            }
        }
        tracing::info!("job queue closed");
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

impl Inner {
    #[tracing::instrument(skip(self, job, handler), fields(job_id = %job.id, job_type = %job.job_type))]
    async fn run_job(&self, job: Job, handler: &dyn JobHandler) {
        self.pending.write().await.insert(job.id, JobState::Active);
        let started = Instant::now();

        let outcome = match AssertUnwindSafe(handler.handle(&job)).catch_unwind().await {
            Ok(result) => result.map_err(|failure| failure.message),
            Err(_) => Err("job handler panicked".to_string()),
        };

        metrics::histogram!("job_duration_seconds", "job_type" => job.job_type.clone())
            .record(started.elapsed().as_secs_f64());

        self.finish(job, outcome).await;
    }

    /// Moves a job to its terminal state and publishes the outcome.
    async fn finish(&self, job: Job, outcome: std::result::Result<(), String>) {
        self.pending.write().await.remove(&job.id);

        let event = match outcome {
            Ok(()) => {
                self.completed.fetch_add(1, Ordering::SeqCst);
                metrics::counter!("jobs_completed_total", "job_type" => job.job_type.clone())
                    .increment(1);
                tracing::debug!(job_id = %job.id, "job completed");
                JobEvent::Completed {
                    job_id: job.id,
                    job_type: job.job_type,
                }
            }
            Err(error) => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                metrics::counter!("jobs_failed_total", "job_type" => job.job_type.clone())
                    .increment(1);
                tracing::debug!(job_id = %job.id, %error, "job failed");
                JobEvent::Failed {
                    job_id: job.id,
                    job_type: job.job_type,
                    error,
                }
            }
        };

        self.observers
            .lock()
            .await
            .retain(|observer| observer.send(event.clone()).is_ok());
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
