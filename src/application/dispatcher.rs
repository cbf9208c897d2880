//! Fire-and-forget dispatch of admitted submissions.
//!
//! Admitted tasks go into a bounded queue drained by a fixed pool of tokio
//! worker tasks. `submit` never waits: a full queue is reported right away.
//! Each submission runs in its own spawned task, so a panicking submitter
//! only loses that one submission.

use crate::application::config::{ConfigError, DispatcherConfig};
use crate::application::metrics::Metrics;
use crate::application::ports::Submitter;
use crate::domain::submission::{SubmissionError, SubmissionOutcome, SubmissionTask};
use reqwest::Url;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Error returned when the dispatcher cannot be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    /// Dispatcher configuration validation failed
    Config(ConfigError),
    /// Called outside of a tokio runtime
    NoRuntime,
}

impl std::fmt::Display for StartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartError::Config(e) => write!(f, "dispatcher configuration error: {}", e),
            StartError::NoRuntime => write!(f, "dispatcher must be started inside a tokio runtime"),
        }
    }
}

impl std::error::Error for StartError {}

impl From<ConfigError> for StartError {
    fn from(e: ConfigError) -> Self {
        StartError::Config(e)
    }
}

/// Error returned when an admitted task cannot be queued.
///
/// The admission slot has already been spent at this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// Every queue slot is taken
    QueueFull,
    /// The dispatcher has been shut down
    Closed,
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::QueueFull => write!(f, "dispatch queue is full"),
            DispatchError::Closed => write!(f, "dispatcher is shut down"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Error returned when shutdown does not complete cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownError {
    /// Workers were still busy when the shutdown timeout elapsed
    Timeout(Duration),
}

impl std::fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownError::Timeout(timeout) => {
                write!(f, "dispatcher did not drain within {:?}", timeout)
            }
        }
    }
}

impl std::error::Error for ShutdownError {}

/// Handle to the outcome of one dispatched submission.
///
/// Dropping the handle does not cancel the submission.
#[derive(Debug)]
pub struct SubmissionHandle {
    id: u64,
    receiver: oneshot::Receiver<SubmissionOutcome>,
}

impl SubmissionHandle {
    /// Sequence number assigned at dispatch, also used in log events.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the submission to finish.
    ///
    /// Returns `SubmissionError::Aborted` if the task was dropped without
    /// producing an outcome.
    pub async fn outcome(self) -> SubmissionOutcome {
        self.receiver
            .await
            .unwrap_or(Err(SubmissionError::Aborted))
    }
}

struct Job {
    id: u64,
    task: SubmissionTask,
    reply: oneshot::Sender<SubmissionOutcome>,
}

type SharedQueue = Arc<tokio::sync::Mutex<mpsc::Receiver<Job>>>;

/// Bounded worker pool executing admitted submissions.
#[derive(Debug)]
pub struct Dispatcher {
    /// `None` once shut down
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    /// Held across the drain so concurrent `shutdown` calls wait for it
    workers: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
    config: DispatcherConfig,
    endpoint: Url,
    metrics: Metrics,
    next_id: AtomicU64,
}

impl Dispatcher {
    /// Start the worker pool on the current tokio runtime.
    ///
    /// # Errors
    /// Returns `StartError::Config` for an invalid config and
    /// `StartError::NoRuntime` when called outside a runtime.
    pub fn start<S>(
        submitter: S,
        endpoint: Url,
        config: DispatcherConfig,
        metrics: Metrics,
    ) -> Result<Self, StartError>
    where
        S: Submitter,
    {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| StartError::NoRuntime)?;

        let (sender, receiver) = mpsc::channel(config.queue_capacity);
        let queue: SharedQueue = Arc::new(tokio::sync::Mutex::new(receiver));
        let submitter = Arc::new(submitter);

        let workers = (0..config.workers)
            .map(|worker| {
                runtime.spawn(run_worker(
                    worker,
                    Arc::clone(&queue),
                    Arc::clone(&submitter),
                    endpoint.clone(),
                    metrics.clone(),
                ))
            })
            .collect();

        tracing::debug!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            endpoint = %endpoint,
            "dispatcher started"
        );

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            workers: tokio::sync::Mutex::new(workers),
            config,
            endpoint,
            metrics,
            next_id: AtomicU64::new(0),
        })
    }

    /// Queue `task` for execution and return immediately.
    ///
    /// # Errors
    /// Returns `DispatchError::QueueFull` when the queue is at capacity and
    /// `DispatchError::Closed` after shutdown.
    pub fn submit(&self, task: SubmissionTask) -> Result<SubmissionHandle, DispatchError> {
        let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = guard.as_ref().ok_or(DispatchError::Closed)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, receiver) = oneshot::channel();

        match sender.try_send(Job { id, task, reply }) {
            Ok(()) => Ok(SubmissionHandle { id, receiver }),
            Err(TrySendError::Full(_)) => {
                tracing::warn!(id, "dispatch queue full, dropping admitted submission");
                Err(DispatchError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(DispatchError::Closed),
        }
    }

    /// Number of queued submissions no worker has picked up yet.
    pub fn queued(&self) -> usize {
        let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .map_or(0, |s| s.max_capacity() - s.capacity())
    }

    /// Whether `shutdown` has been called.
    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Stop accepting submissions and wait for queued ones to finish.
    ///
    /// Queued submissions still run. Waits at most the configured shutdown
    /// timeout; workers still busy after that keep running, and a
    /// later call waits for them again. Concurrent callers all wait for the
    /// same drain. Calling this after a completed shutdown is a no-op.
    ///
    /// # Errors
    /// Returns `ShutdownError::Timeout` if the workers did not drain in time.
    pub async fn shutdown(&self) -> Result<(), ShutdownError> {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(sender);

        let timeout = self.config.shutdown_timeout;
        let drained = tokio::time::timeout(timeout, async {
            let mut workers = self.workers.lock().await;
            // Pop only after a handle resolved, so a timed out drain can resume
            while let Some(worker) = workers.last_mut() {
                if let Err(e) = worker.await {
                    tracing::warn!(error = %e, "dispatch worker did not finish cleanly");
                }
                workers.pop();
            }
        })
        .await;

        match drained {
            Ok(()) => {
                tracing::debug!("dispatcher shut down");
                Ok(())
            }
            Err(_) => Err(ShutdownError::Timeout(timeout)),
        }
    }

    /// The endpoint every submission is sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the dispatcher configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

async fn run_worker<S: Submitter>(
    worker: usize,
    queue: SharedQueue,
    submitter: Arc<S>,
    endpoint: Url,
    metrics: Metrics,
) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some(job) = next else {
            break;
        };

        let outcome = execute(job.task, &submitter, &endpoint).await;
        match &outcome {
            Ok(response) => {
                metrics.record_submission_success();
                tracing::debug!(
                    id = job.id,
                    worker,
                    status = response.status,
                    body = %response.body,
                    "submission accepted"
                );
            }
            Err(e) => {
                metrics.record_submission_failure();
                tracing::warn!(id = job.id, worker, error = %e, "submission failed");
            }
        }

        // Nobody may be waiting for the outcome
        let _ = job.reply.send(outcome);
    }
}

async fn execute<S: Submitter>(
    task: SubmissionTask,
    submitter: &Arc<S>,
    endpoint: &Url,
) -> SubmissionOutcome {
    let body = task.encode()?;
    let submitter = Arc::clone(submitter);
    let endpoint = endpoint.clone();

    match tokio::spawn(async move { submitter.submit(endpoint, body).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, "submission task did not complete");
            Err(SubmissionError::Aborted)
        }
    }
}
