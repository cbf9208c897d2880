//! # submit-throttle
//!
//! Rate limited submission of signed documents to a remote HTTP API.
//!
//! Every call is checked against one shared time window that allows at most
//! `capacity` submissions. Admitted calls are handed to a small pool of
//! workers that POST the document; calls over the limit are rejected right
//! away and never reach the network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use submit_throttle::{Description, Document, RateLimitedClient, TimeUnit};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // Five submissions per second
//! let client = RateLimitedClient::builder()
//!     .with_rate(TimeUnit::Seconds, 5)
//!     .with_endpoint("https://ismp.crpt.ru/api/v3/lk/documents/create")
//!     .build()?;
//!
//! let document = Document {
//!     description: Description::new("7700000000"),
//!     doc_id: "doc-1".to_string(),
//!     ..Document::default()
//! };
//!
//! let admission = client.process(document, "base64-signature")?;
//! match admission.into_handle() {
//!     Some(handle) => {
//!         let id = handle.id();
//!         println!("#{} finished: {:?}", id, handle.outcome().await);
//!     }
//!     None => println!("rejected, try again in the next window"),
//! }
//!
//! client.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Windows
//!
//! The first window opens on the first call. A window lasts `duration`; the
//! first call strictly after its end replaces it with a fresh one starting at
//! that call. There is no sliding and no carry-over of unused slots.
//!
//! ```text
//! capacity = 3, duration = 1s
//!
//!   t=0.0  admit   (window opens at 0.0)
//!   t=0.2  admit
//!   t=0.4  admit
//!   t=0.6  reject  (window full)
//!   t=1.0  reject  (still inside the window)
//!   t=1.3  admit   (new window opens at 1.3)
//! ```
//!
//! ## Using the pieces directly
//!
//! `AdmissionGate` can be used on its own when you only need the decision:
//!
//! ```rust
//! use submit_throttle::{AdmissionDecision, AdmissionGate, GateConfig};
//! use std::time::{Duration, Instant};
//!
//! let gate = AdmissionGate::new(GateConfig::new(2, Duration::from_secs(1)).unwrap());
//! let now = Instant::now();
//!
//! assert_eq!(gate.try_admit(now), AdmissionDecision::Admitted);
//! assert_eq!(gate.try_admit(now), AdmissionDecision::Admitted);
//! assert_eq!(gate.try_admit(now), AdmissionDecision::Rejected);
//! ```
//!
//! ## Observability
//!
//! Decisions are logged at `debug` level through `tracing`. Failed
//! submissions are logged at `warn`. Counters are available as well:
//!
//! ```rust,no_run
//! # use submit_throttle::RateLimitedClient;
//! # fn show(client: &RateLimitedClient) {
//! let snapshot = client.metrics().snapshot();
//! println!("granted: {}", snapshot.admissions_granted);
//! println!("rejected: {}", snapshot.admissions_rejected);
//! println!("rejection rate: {:.2}%", snapshot.rejection_rate() * 100.0);
//! # }
//! ```

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    document::{Description, Document, Product, SubmissionRequest},
    submission::{SubmissionError, SubmissionOutcome, SubmissionResponse, SubmissionTask},
    window::{AdmissionDecision, RateLimitWindow, WindowTracker},
};

pub use application::{
    config::{ConfigError, DispatcherConfig, GateConfig, TimeUnit},
    dispatcher::{DispatchError, Dispatcher, ShutdownError, StartError, SubmissionHandle},
    gate::AdmissionGate,
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, Submitter},
};

pub use infrastructure::{
    client::{Admission, BuildError, RateLimitedClient, RateLimitedClientBuilder},
    clock::SystemClock,
    http::HttpSubmitter,
};
