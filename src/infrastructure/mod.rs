//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time vs mock)
//! - HTTP submission (reqwest)
//! - The rate limited client that wires everything together

pub mod client;
pub mod clock;
pub mod http;

/// Test doubles: a manually driven clock, a recording submitter and a log
/// capturing layer.
///
/// Compiled for this crate's own tests, and for dependants that enable the
/// `test-helpers` feature:
/// ```toml
/// [dev-dependencies]
/// submit-throttle = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
