//! Submission tasks and their outcomes.

use crate::domain::document::SubmissionRequest;

/// Work item handed to the dispatcher after admission.
///
/// The gate and the dispatcher never look inside the request; it is only
/// encoded right before the network call.
#[derive(Debug, Clone)]
pub struct SubmissionTask {
    request: SubmissionRequest,
}

impl SubmissionTask {
    pub fn new(request: SubmissionRequest) -> Self {
        Self { request }
    }

    /// Encode the task into the request body.
    pub fn encode(&self) -> Result<Vec<u8>, SubmissionError> {
        self.request.encode()
    }

    /// The request carried by this task.
    pub fn request(&self) -> &SubmissionRequest {
        &self.request
    }
}

impl From<SubmissionRequest> for SubmissionTask {
    fn from(request: SubmissionRequest) -> Self {
        Self::new(request)
    }
}

/// Successful response from the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

/// Failure of a single submission.
///
/// Submission failures are isolated to the task that produced them and never
/// reach the admission path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The request could not be encoded
    Serialization(String),
    /// The request could not be delivered (connect, TLS, timeout, ...)
    Transport(String),
    /// The endpoint answered with a non-success status
    Status {
        /// HTTP status code
        status: u16,
        /// Response body as text
        body: String,
    },
    /// The task was dropped before it produced an outcome
    Aborted,
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::Serialization(e) => write!(f, "failed to encode submission: {}", e),
            SubmissionError::Transport(e) => write!(f, "failed to deliver submission: {}", e),
            SubmissionError::Status { status, .. } => {
                write!(f, "endpoint rejected submission with status {}", status)
            }
            SubmissionError::Aborted => write!(f, "submission aborted before completion"),
        }
    }
}

impl std::error::Error for SubmissionError {}

/// Result of a dispatched submission.
pub type SubmissionOutcome = Result<SubmissionResponse, SubmissionError>;
