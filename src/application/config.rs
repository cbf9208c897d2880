//! Validated configuration for the gate and the dispatcher.
//!
//! Values are checked once, at construction. A config that exists is valid,
//! so nothing downstream has to re-check it at call time.

use std::time::Duration;

/// Error returned when configuration validation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Window capacity must be greater than zero
    ZeroCapacity,
    /// Window duration must be greater than zero
    ZeroWindow,
    /// Dispatcher needs at least one worker
    ZeroWorkers,
    /// Dispatcher queue capacity must be greater than zero
    ZeroQueueCapacity,
    /// Timeouts must be greater than zero
    ZeroTimeout,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "window capacity must be greater than 0"),
            ConfigError::ZeroWindow => write!(f, "window duration must be greater than 0"),
            ConfigError::ZeroWorkers => write!(f, "worker count must be greater than 0"),
            ConfigError::ZeroQueueCapacity => {
                write!(f, "dispatch queue capacity must be greater than 0")
            }
            ConfigError::ZeroTimeout => write!(f, "timeout must be greater than 0"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Unit of time for `GateConfig::per_unit`.
///
/// A window built from a unit lasts exactly one of that unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit.
    pub fn as_duration(&self) -> Duration {
        match self {
            TimeUnit::Milliseconds => Duration::from_millis(1),
            TimeUnit::Seconds => Duration::from_secs(1),
            TimeUnit::Minutes => Duration::from_secs(60),
            TimeUnit::Hours => Duration::from_secs(60 * 60),
            TimeUnit::Days => Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Shape of the admission windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    capacity: usize,
    window: Duration,
}

impl GateConfig {
    /// Allow `capacity` admissions per `window`.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroCapacity` or `ConfigError::ZeroWindow` if
    /// either value is zero.
    pub fn new(capacity: usize, window: Duration) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(Self { capacity, window })
    }

    /// Allow `capacity` admissions per one `unit` of time.
    ///
    /// ```
    /// use submit_throttle::{GateConfig, TimeUnit};
    /// use std::time::Duration;
    ///
    /// let config = GateConfig::per_unit(TimeUnit::Seconds, 5).unwrap();
    /// assert_eq!(config.capacity(), 5);
    /// assert_eq!(config.window(), Duration::from_secs(1));
    /// ```
    pub fn per_unit(unit: TimeUnit, capacity: usize) -> Result<Self, ConfigError> {
        Self::new(capacity, unit.as_duration())
    }

    /// Maximum admissions per window.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length of a window.
    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Sizing of the dispatch worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Number of worker tasks draining the queue
    pub workers: usize,
    /// Maximum number of queued, not yet started submissions
    pub queue_capacity: usize,
    /// How long `shutdown` waits for in-flight submissions
    pub shutdown_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 1024,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl DispatcherConfig {
    /// Create a dispatcher config with the given pool size.
    ///
    /// # Errors
    /// Returns a `ConfigError` if `workers` or `queue_capacity` is zero.
    pub fn new(workers: usize, queue_capacity: usize) -> Result<Self, ConfigError> {
        let config = Self {
            workers,
            queue_capacity,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set how long `shutdown` waits for in-flight submissions.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Check every field.
    ///
    /// The fields are public, so the dispatcher validates again on start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.shutdown_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
