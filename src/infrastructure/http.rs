//! HTTP adapter for the `Submitter` port.
//!
//! Posts the encoded body as JSON and maps the response:
//! - 2xx: `SubmissionResponse` with the status and body text
//! - any other status: `SubmissionError::Status`
//! - connect, TLS, timeout or body read errors: `SubmissionError::Transport`

use crate::application::ports::Submitter;
use crate::domain::submission::{SubmissionError, SubmissionOutcome, SubmissionResponse};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;

/// Default timeout for a whole request, including reading the body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `Submitter` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
}

impl HttpSubmitter {
    /// Create a submitter with the default request timeout.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a submitter whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Submitter for HttpSubmitter {
    async fn submit(&self, endpoint: Url, body: Vec<u8>) -> SubmissionOutcome {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        if status.is_success() {
            Ok(SubmissionResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(SubmissionError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
