//! Mock submitter for testing.

use crate::application::ports::Submitter;
use crate::domain::submission::{SubmissionError, SubmissionOutcome, SubmissionResponse};
use reqwest::Url;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A submission as the mock received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub endpoint: Url,
    pub body: Vec<u8>,
}

impl RecordedSubmission {
    /// The body parsed as JSON, or `Value::Null` if it is not JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// What the mock does with a submission.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Succeed with this response
    Respond(SubmissionResponse),
    /// Fail with this error
    Fail(SubmissionError),
    /// Panic inside the submission
    Panic,
}

impl MockResponse {
    /// A 200 response with `body`.
    pub fn ok(body: &str) -> Self {
        MockResponse::Respond(SubmissionResponse {
            status: 200,
            body: body.to_string(),
        })
    }
}

type Responder = Arc<dyn Fn(&RecordedSubmission) -> MockResponse + Send + Sync>;

/// Records every submission and answers from a configurable responder.
///
/// By default every submission succeeds with status 200 and body `ok`.
/// Clones share the recorded calls.
#[derive(Clone)]
pub struct MockSubmitter {
    calls: Arc<Mutex<Vec<RecordedSubmission>>>,
    responder: Responder,
    delay: Option<Duration>,
}

impl MockSubmitter {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responder: Arc::new(|_| MockResponse::ok("ok")),
            delay: None,
        }
    }

    /// Decide the response per submission.
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&RecordedSubmission) -> MockResponse + Send + Sync + 'static,
    {
        self.responder = Arc::new(responder);
        self
    }

    /// Fail every submission with `error`.
    pub fn failing(error: SubmissionError) -> Self {
        Self::new().with_responder(move |_| MockResponse::Fail(error.clone()))
    }

    /// Sleep this long before answering, to simulate a slow endpoint.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All submissions received so far.
    pub fn calls(&self) -> Vec<RecordedSubmission> {
        self.calls
            .lock()
            .expect("MockSubmitter mutex poisoned - a test thread panicked while holding the lock")
            .clone()
    }

    /// Number of submissions received so far.
    pub fn count(&self) -> usize {
        self.calls
            .lock()
            .expect("MockSubmitter mutex poisoned - a test thread panicked while holding the lock")
            .len()
    }
}

impl Default for MockSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockSubmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSubmitter")
            .field("calls", &self.count())
            .field("responder", &"<fn>")
            .field("delay", &self.delay)
            .finish()
    }
}

impl Submitter for MockSubmitter {
    async fn submit(&self, endpoint: Url, body: Vec<u8>) -> SubmissionOutcome {
        let submission = RecordedSubmission { endpoint, body };
        let response = (self.responder)(&submission);
        self.calls
            .lock()
            .expect("MockSubmitter mutex poisoned - a test thread panicked while holding the lock")
            .push(submission);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match response {
            MockResponse::Respond(response) => Ok(response),
            MockResponse::Fail(error) => Err(error),
            MockResponse::Panic => panic!("MockSubmitter configured to panic"),
        }
    }
}
