//! Fixed rate limit windows and the rules for rolling them over.
//!
//! A window grants at most `capacity` admissions for `duration`, starting at
//! the instant of the first admission attempt that opened it.

use std::time::{Duration, Instant};

/// Outcome of a single admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// A slot was granted in the current window
    Admitted,
    /// The current window is full
    Rejected,
}

impl AdmissionDecision {
    /// Check if this decision is Admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionDecision::Admitted)
    }

    /// Check if this decision is Rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, AdmissionDecision::Rejected)
    }
}

/// A single rate limit window.
///
/// Windows are plain values. The admission gate keeps the live one behind a
/// lock and replaces it wholesale on rollover, so a copy taken from the gate
/// always describes one consistent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitWindow {
    /// When this window opened
    pub window_start: Instant,
    /// Admissions granted inside this window
    pub granted_count: usize,
    /// Maximum admissions per window
    pub capacity: usize,
    /// Length of the window
    pub duration: Duration,
}

impl RateLimitWindow {
    /// Whether another admission fits in this window.
    pub fn has_capacity(&self) -> bool {
        self.granted_count < self.capacity
    }

    /// Slots left in this window.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.granted_count)
    }

    /// The instant after which this window is expired.
    ///
    /// Returns `None` when the end is not representable, in which case the
    /// window never expires.
    pub fn window_end(&self) -> Option<Instant> {
        self.window_start.checked_add(self.duration)
    }
}

/// Decides window expiry and produces fresh windows.
///
/// The tracker is pure: it never stores a window itself. Publishing the
/// window it returns is the caller's job.
///
/// # Example
/// ```
/// use submit_throttle::WindowTracker;
/// use std::time::{Duration, Instant};
///
/// let tracker = WindowTracker::new(5, Duration::from_secs(1));
/// let now = Instant::now();
/// let window = tracker.roll(now);
///
/// assert_eq!(window.granted_count, 0);
/// assert!(!tracker.is_expired(&window, now + Duration::from_secs(1)));
/// assert!(tracker.is_expired(&window, now + Duration::from_millis(1001)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowTracker {
    capacity: usize,
    duration: Duration,
}

impl WindowTracker {
    /// Create a tracker for windows of `capacity` admissions per `duration`.
    ///
    /// Validation of both values happens in `GateConfig`.
    pub fn new(capacity: usize, duration: Duration) -> Self {
        Self { capacity, duration }
    }

    /// True iff `now` is strictly after the end of `window`.
    pub fn is_expired(&self, window: &RateLimitWindow, now: Instant) -> bool {
        match window.window_end() {
            Some(end) => now > end,
            None => false,
        }
    }

    /// A fresh, empty window opening at `now`.
    pub fn roll(&self, now: Instant) -> RateLimitWindow {
        RateLimitWindow {
            window_start: now,
            granted_count: 0,
            capacity: self.capacity,
            duration: self.duration,
        }
    }

    /// Maximum admissions per window.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length of each window.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_produces_empty_window() {
        let tracker = WindowTracker::new(3, Duration::from_secs(1));
        let now = Instant::now();
        let window = tracker.roll(now);

        assert_eq!(window.window_start, now);
        assert_eq!(window.granted_count, 0);
        assert_eq!(window.capacity, 3);
        assert_eq!(window.duration, Duration::from_secs(1));
        assert_eq!(window.remaining(), 3);
    }

    #[test]
    fn test_expiry_is_strict() {
        let tracker = WindowTracker::new(1, Duration::from_secs(1));
        let start = Instant::now();
        let window = tracker.roll(start);

        assert!(!tracker.is_expired(&window, start));
        assert!(!tracker.is_expired(&window, start + Duration::from_millis(999)));
        // Exactly at the boundary the window is still active
        assert!(!tracker.is_expired(&window, start + Duration::from_secs(1)));
        assert!(tracker.is_expired(&window, start + Duration::from_nanos(1_000_000_001)));
    }

    #[test]
    fn test_earlier_timestamp_never_expires_window() {
        let tracker = WindowTracker::new(1, Duration::from_millis(10));
        let start = Instant::now() + Duration::from_secs(5);
        let window = tracker.roll(start);

        assert!(!tracker.is_expired(&window, start - Duration::from_secs(1)));
    }

    #[test]
    fn test_unrepresentable_end_never_expires() {
        let tracker = WindowTracker::new(1, Duration::MAX);
        let now = Instant::now();
        let window = tracker.roll(now);

        assert_eq!(window.window_end(), None);
        assert!(!tracker.is_expired(&window, now + Duration::from_secs(3600)));
    }

    #[test]
    fn test_capacity_accounting() {
        let tracker = WindowTracker::new(2, Duration::from_secs(1));
        let mut window = tracker.roll(Instant::now());

        assert!(window.has_capacity());
        window.granted_count = 2;
        assert!(!window.has_capacity());
        assert_eq!(window.remaining(), 0);
    }

    #[test]
    fn test_decision_helpers() {
        assert!(AdmissionDecision::Admitted.is_admitted());
        assert!(!AdmissionDecision::Admitted.is_rejected());
        assert!(AdmissionDecision::Rejected.is_rejected());
    }
}
