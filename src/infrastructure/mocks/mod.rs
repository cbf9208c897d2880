//! Mock implementations for testing.
//!
//! This module provides test doubles for the ports and for log capture,
//! enabling controlled testing of admission and dispatch.

pub mod clock;
pub mod layer;
pub mod submitter;

pub use clock::MockClock;
pub use layer::{CapturedEvent, MockCaptureLayer};
pub use submitter::{MockResponse, MockSubmitter, RecordedSubmission};
