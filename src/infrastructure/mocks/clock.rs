//! Mock clock for testing.

use crate::application::ports::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Manually driven clock.
///
/// Time only moves when a test calls `advance` or `set`, which makes window
/// rollover deterministic. Clones share the same time, so a clone handed to
/// a client can be driven from the test body or from other threads.
///
/// Time is stored as a nanosecond offset from the start instant, so the
/// clock can never be set before its start.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a mock clock starting at a specific instant.
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a mock clock starting at the real current instant.
    pub fn starting_now() -> Self {
        Self::new(Instant::now())
    }

    /// Move time forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.offset_nanos
            .fetch_add(Self::to_nanos(duration), Ordering::SeqCst);
    }

    /// Jump to `instant`. Instants before the start clamp to the start.
    pub fn set(&self, instant: Instant) {
        let offset = instant.saturating_duration_since(self.start);
        self.offset_nanos
            .store(Self::to_nanos(offset), Ordering::SeqCst);
    }

    /// Time elapsed since the start instant.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }

    fn to_nanos(duration: Duration) -> u64 {
        duration.as_nanos().try_into().unwrap_or(u64::MAX)
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_advance_and_set() {
        let start = Instant::now();
        let clock = MockClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now(), start + Duration::from_millis(1500));

        clock.set(start + Duration::from_secs(90));
        assert_eq!(clock.elapsed(), Duration::from_secs(90));
    }

    #[test]
    fn test_set_before_start_clamps() {
        let start = Instant::now() + Duration::from_secs(10);
        let clock = MockClock::new(start);
        clock.advance(Duration::from_secs(3));

        clock.set(start - Duration::from_secs(1));
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_clones_share_time() {
        let clock = MockClock::starting_now();
        let remote = clock.clone();

        thread::spawn(move || remote.advance(Duration::from_secs(2)))
            .join()
            .unwrap();

        assert_eq!(clock.elapsed(), Duration::from_secs(2));
    }
}
