//! Observability metrics for admission and dispatch.
//!
//! Provides counters about gate decisions and submission outcomes for
//! monitoring and debugging.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking admission and submission statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters, so the gate and the dispatcher can report
/// into one instance.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Calls that were granted a slot
    admissions_granted: AtomicU64,
    /// Calls that found the window full
    admissions_rejected: AtomicU64,
    /// Windows opened, including the first one
    windows_rolled: AtomicU64,
    /// Submissions the endpoint accepted
    submissions_succeeded: AtomicU64,
    /// Submissions that failed to encode, deliver or were refused
    submissions_failed: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                admissions_granted: AtomicU64::new(0),
                admissions_rejected: AtomicU64::new(0),
                windows_rolled: AtomicU64::new(0),
                submissions_succeeded: AtomicU64::new(0),
                submissions_failed: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_granted(&self) {
        self.inner.admissions_granted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.inner
            .admissions_rejected
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rollover(&self) {
        self.inner.windows_rolled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_submission_success(&self) {
        self.inner
            .submissions_succeeded
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_submission_failure(&self) {
        self.inner
            .submissions_failed
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total number of admissions granted.
    pub fn admissions_granted(&self) -> u64 {
        self.inner.admissions_granted.load(Ordering::Relaxed)
    }

    /// Get the total number of admissions rejected.
    pub fn admissions_rejected(&self) -> u64 {
        self.inner.admissions_rejected.load(Ordering::Relaxed)
    }

    /// Get the number of windows opened so far.
    pub fn windows_rolled(&self) -> u64 {
        self.inner.windows_rolled.load(Ordering::Relaxed)
    }

    /// Get the number of successful submissions.
    pub fn submissions_succeeded(&self) -> u64 {
        self.inner.submissions_succeeded.load(Ordering::Relaxed)
    }

    /// Get the number of failed submissions.
    pub fn submissions_failed(&self) -> u64 {
        self.inner.submissions_failed.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            admissions_granted: self.admissions_granted(),
            admissions_rejected: self.admissions_rejected(),
            windows_rolled: self.windows_rolled(),
            submissions_succeeded: self.submissions_succeeded(),
            submissions_failed: self.submissions_failed(),
        }
    }

    /// Reset all metrics to zero.
    ///
    /// Useful for testing or when starting a new monitoring period.
    pub fn reset(&self) {
        self.inner.admissions_granted.store(0, Ordering::Relaxed);
        self.inner.admissions_rejected.store(0, Ordering::Relaxed);
        self.inner.windows_rolled.store(0, Ordering::Relaxed);
        self.inner.submissions_succeeded.store(0, Ordering::Relaxed);
        self.inner.submissions_failed.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub admissions_granted: u64,
    pub admissions_rejected: u64,
    pub windows_rolled: u64,
    pub submissions_succeeded: u64,
    pub submissions_failed: u64,
}

impl MetricsSnapshot {
    /// Calculate the rejection rate (0.0 to 1.0).
    ///
    /// Returns 0.0 if no decisions have been made.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.total_decisions();
        if total == 0 {
            0.0
        } else {
            self.admissions_rejected as f64 / total as f64
        }
    }

    /// Get the total number of admission decisions (granted + rejected).
    pub fn total_decisions(&self) -> u64 {
        self.admissions_granted
            .saturating_add(self.admissions_rejected)
    }

    /// Submissions that have finished, either way.
    pub fn submissions_completed(&self) -> u64 {
        self.submissions_succeeded
            .saturating_add(self.submissions_failed)
    }
}
