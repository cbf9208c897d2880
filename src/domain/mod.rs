//! Domain layer - pure values with no runtime dependencies.
//!
//! This layer contains the core concepts of the submission throttle:
//! - Rate limit windows and rollover rules
//! - Document records and their JSON encoding
//! - Submission tasks and outcomes
//!
//! Nothing here touches a clock, a lock or the network.

pub mod document;
pub mod submission;
pub mod window;
