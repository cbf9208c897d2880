//! Admission gate.
//!
//! The gate is the single serialization point for admit/reject decisions.
//! Checking expiry, rolling the window, comparing against capacity and
//! incrementing the count all happen under one lock, so two callers can
//! never both take the last slot and a decision never sees half of a
//! rollover.

use crate::application::config::GateConfig;
use crate::application::metrics::Metrics;
use crate::domain::window::{AdmissionDecision, RateLimitWindow, WindowTracker};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Caps admissions per fixed window.
///
/// # Example
/// ```
/// use submit_throttle::{AdmissionDecision, AdmissionGate, GateConfig};
/// use std::time::{Duration, Instant};
///
/// let gate = AdmissionGate::new(GateConfig::new(2, Duration::from_secs(1)).unwrap());
/// let now = Instant::now();
///
/// assert_eq!(gate.try_admit(now), AdmissionDecision::Admitted);
/// assert_eq!(gate.try_admit(now), AdmissionDecision::Admitted);
/// assert_eq!(gate.try_admit(now), AdmissionDecision::Rejected);
///
/// // A fresh window opens once the old one has fully elapsed
/// let later = now + Duration::from_millis(1001);
/// assert_eq!(gate.try_admit(later), AdmissionDecision::Admitted);
/// ```
#[derive(Debug)]
pub struct AdmissionGate {
    tracker: WindowTracker,
    /// `None` until the first admission attempt opens a window
    window: Mutex<Option<RateLimitWindow>>,
    metrics: Metrics,
}

impl AdmissionGate {
    /// Create a gate with its own metrics.
    pub fn new(config: GateConfig) -> Self {
        Self::with_metrics(config, Metrics::new())
    }

    /// Create a gate that reports into `metrics`.
    pub fn with_metrics(config: GateConfig, metrics: Metrics) -> Self {
        Self {
            tracker: WindowTracker::new(config.capacity(), config.window()),
            window: Mutex::new(None),
            metrics,
        }
    }

    /// Decide whether a call made at `now` may proceed.
    ///
    /// Never blocks beyond the critical section and never sleeps, queues or
    /// retries. A `Rejected` decision leaves the window untouched.
    ///
    /// A `now` older than the live window's start is judged against the
    /// live window; windows never move backwards.
    pub fn try_admit(&self, now: Instant) -> AdmissionDecision {
        let mut slot = self.lock_window();

        let rolled = match slot.as_ref() {
            Some(window) => self.tracker.is_expired(window, now),
            None => true,
        };
        if rolled {
            *slot = Some(self.tracker.roll(now));
        }

        let decision = match slot.as_mut() {
            Some(window) if window.has_capacity() => {
                window.granted_count += 1;
                AdmissionDecision::Admitted
            }
            _ => AdmissionDecision::Rejected,
        };
        let granted = slot.as_ref().map_or(0, |w| w.granted_count);
        drop(slot);

        if rolled {
            self.metrics.record_rollover();
            tracing::debug!(capacity = self.tracker.capacity(), "opened rate limit window");
        }

        match decision {
            AdmissionDecision::Admitted => {
                self.metrics.record_granted();
                tracing::debug!(granted, capacity = self.tracker.capacity(), "admitted");
            }
            AdmissionDecision::Rejected => {
                self.metrics.record_rejected();
                tracing::debug!(capacity = self.tracker.capacity(), "rejected, window is full");
            }
        }

        decision
    }

    /// Slots a call made at `now` could still take, without taking one.
    pub fn remaining(&self, now: Instant) -> usize {
        match self.lock_window().as_ref() {
            Some(window) if !self.tracker.is_expired(window, now) => window.remaining(),
            _ => self.tracker.capacity(),
        }
    }

    /// Copy of the live window, if one has been opened.
    pub fn window(&self) -> Option<RateLimitWindow> {
        *self.lock_window()
    }

    /// Admissions granted in the live window.
    pub fn granted_count(&self) -> usize {
        self.lock_window().as_ref().map_or(0, |w| w.granted_count)
    }

    /// The window shape this gate enforces.
    pub fn tracker(&self) -> &WindowTracker {
        &self.tracker
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The window is a plain `Copy` value, assigned in one statement, so a
    /// panic elsewhere cannot leave it half-written. Poisoning is ignored.
    fn lock_window(&self) -> MutexGuard<'_, Option<RateLimitWindow>> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
