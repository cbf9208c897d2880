//! Ports the gate and dispatcher depend on.
//!
//! Adapters for both live in `crate::infrastructure`.

use crate::domain::submission::SubmissionOutcome;
use reqwest::Url;
use std::fmt::Debug;
use std::future::Future;
use std::time::Instant;

/// Source of timestamps for window boundaries.
///
/// `SystemClock` in production, `MockClock` in tests.
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for delivering an encoded submission to the remote endpoint.
///
/// The dispatcher only looks at whether the returned outcome is `Ok` or
/// `Err`. Infrastructure provides `HttpSubmitter`; tests use `MockSubmitter`.
pub trait Submitter: Send + Sync + 'static {
    /// Send `body` to `endpoint` and report what happened.
    ///
    /// # Arguments
    /// * `endpoint` - Where to send the submission
    /// * `body` - The encoded request body
    fn submit(&self, endpoint: Url, body: Vec<u8>)
        -> impl Future<Output = SubmissionOutcome> + Send;
}
