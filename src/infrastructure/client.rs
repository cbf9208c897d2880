//! Rate limited submission client.
//!
//! Ties the pieces together: reads the clock, asks the admission gate and,
//! when a slot is granted, hands the signed document to the dispatcher.

use crate::application::{
    config::{ConfigError, DispatcherConfig, GateConfig, TimeUnit},
    dispatcher::{DispatchError, Dispatcher, ShutdownError, StartError, SubmissionHandle},
    gate::AdmissionGate,
    metrics::Metrics,
    ports::{Clock, Submitter},
};
use crate::domain::{
    document::{Document, SubmissionRequest},
    submission::SubmissionTask,
    window::AdmissionDecision,
};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::http::{HttpSubmitter, DEFAULT_REQUEST_TIMEOUT};

use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;

/// Error returned when building a `RateLimitedClient` fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Configuration validation failed
    Config(ConfigError),
    /// No endpoint was configured
    MissingEndpoint,
    /// The endpoint is not an http(s) URL
    InvalidEndpoint(String),
    /// Built outside of a tokio runtime
    NoRuntime,
    /// The HTTP client could not be created
    HttpClient(String),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Config(e) => write!(f, "configuration error: {}", e),
            BuildError::MissingEndpoint => write!(f, "an endpoint is required"),
            BuildError::InvalidEndpoint(e) => write!(f, "invalid endpoint: {}", e),
            BuildError::NoRuntime => {
                write!(f, "client must be built inside a tokio runtime")
            }
            BuildError::HttpClient(e) => write!(f, "failed to create HTTP client: {}", e),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<ConfigError> for BuildError {
    fn from(e: ConfigError) -> Self {
        BuildError::Config(e)
    }
}

impl From<StartError> for BuildError {
    fn from(e: StartError) -> Self {
        match e {
            StartError::Config(e) => BuildError::Config(e),
            StartError::NoRuntime => BuildError::NoRuntime,
        }
    }
}

/// Result of `RateLimitedClient::process`.
#[derive(Debug)]
pub enum Admission {
    /// Admitted and queued; the handle reports the submission outcome
    Admitted(SubmissionHandle),
    /// The current window is full; nothing was sent
    Rejected,
}

impl Admission {
    /// The bare admission decision.
    pub fn decision(&self) -> AdmissionDecision {
        match self {
            Admission::Admitted(_) => AdmissionDecision::Admitted,
            Admission::Rejected => AdmissionDecision::Rejected,
        }
    }

    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Admission::Rejected)
    }

    /// The submission handle, if admitted.
    pub fn into_handle(self) -> Option<SubmissionHandle> {
        match self {
            Admission::Admitted(handle) => Some(handle),
            Admission::Rejected => None,
        }
    }
}

type StartFn = Box<dyn FnOnce(Url, DispatcherConfig, Metrics) -> Result<Dispatcher, StartError>>;

/// Builder for constructing a `RateLimitedClient`.
pub struct RateLimitedClientBuilder {
    capacity: usize,
    window: Duration,
    endpoint: Option<String>,
    clock: Option<Arc<dyn Clock>>,
    dispatcher: DispatcherConfig,
    request_timeout: Duration,
    start: Option<StartFn>,
}

impl RateLimitedClientBuilder {
    /// Allow `capacity` submissions per `window`.
    ///
    /// Both values are validated when `build()` is called.
    pub fn with_limit(mut self, capacity: usize, window: Duration) -> Self {
        self.capacity = capacity;
        self.window = window;
        self
    }

    /// Allow `capacity` submissions per one `unit` of time.
    pub fn with_rate(self, unit: TimeUnit, capacity: usize) -> Self {
        self.with_limit(capacity, unit.as_duration())
    }

    /// Set the URL every document is posted to.
    ///
    /// The URL is parsed when `build()` is called.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a custom clock (mainly for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Number of worker tasks performing submissions.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.dispatcher.workers = workers;
        self
    }

    /// Maximum number of admitted submissions waiting for a worker.
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.dispatcher.queue_capacity = queue_capacity;
        self
    }

    /// How long `shutdown` waits for in-flight submissions.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.dispatcher.shutdown_timeout = timeout;
        self
    }

    /// Timeout for each HTTP request.
    ///
    /// Ignored when a custom submitter is set.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Replace the HTTP submitter with another `Submitter`.
    pub fn with_submitter<S>(mut self, submitter: S) -> Self
    where
        S: Submitter,
    {
        self.start = Some(Box::new(move |endpoint, config, metrics| {
            Dispatcher::start(submitter, endpoint, config, metrics)
        }));
        self
    }

    /// Build the client and start its workers on the current tokio runtime.
    ///
    /// # Errors
    /// Returns `BuildError` if the configuration is invalid, the endpoint is
    /// missing or malformed, or no runtime is available.
    pub fn build(self) -> Result<RateLimitedClient, BuildError> {
        let gate_config = GateConfig::new(self.capacity, self.window)?;
        self.dispatcher.validate()?;
        let endpoint = parse_endpoint(self.endpoint.as_deref())?;

        let metrics = Metrics::new();
        let dispatcher = match self.start {
            Some(start) => start(endpoint, self.dispatcher, metrics.clone())?,
            None => {
                if self.request_timeout.is_zero() {
                    return Err(ConfigError::ZeroTimeout.into());
                }
                let submitter = HttpSubmitter::with_timeout(self.request_timeout)
                    .map_err(|e| BuildError::HttpClient(e.to_string()))?;
                Dispatcher::start(submitter, endpoint, self.dispatcher, metrics.clone())?
            }
        };

        Ok(RateLimitedClient {
            gate: AdmissionGate::with_metrics(gate_config, metrics),
            dispatcher,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock::new())),
        })
    }
}

fn parse_endpoint(endpoint: Option<&str>) -> Result<Url, BuildError> {
    let raw = endpoint.ok_or(BuildError::MissingEndpoint)?;
    let url = Url::parse(raw).map_err(|e| BuildError::InvalidEndpoint(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(BuildError::InvalidEndpoint(format!(
            "unsupported scheme `{}`",
            other
        ))),
    }
}

/// Submits signed documents while capping how many go out per window.
///
/// Share it behind an `Arc` to call `process` from many tasks or threads.
///
/// # Example
///
/// ```no_run
/// # use submit_throttle::{Document, RateLimitedClient, TimeUnit};
/// # async fn example() {
/// let client = RateLimitedClient::builder()
///     .with_rate(TimeUnit::Seconds, 5)
///     .with_endpoint("https://ismp.crpt.ru/api/v3/lk/documents/create")
///     .build()
///     .unwrap();
///
/// let admission = client.process(Document::default(), "signature").unwrap();
/// if let Some(handle) = admission.into_handle() {
///     match handle.outcome().await {
///         Ok(response) => println!("accepted: {}", response.body),
///         Err(e) => eprintln!("failed: {}", e),
///     }
/// }
///
/// client.shutdown().await.unwrap();
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimitedClient {
    gate: AdmissionGate,
    dispatcher: Dispatcher,
    clock: Arc<dyn Clock>,
}

impl RateLimitedClient {
    /// Create a builder for configuring the client.
    ///
    /// Defaults:
    /// - Limit: 10 submissions per second
    /// - Workers: 4, queue capacity 1024
    /// - Request timeout: 30 seconds
    /// - Shutdown timeout: 30 seconds
    /// - Endpoint: none, must be set
    pub fn builder() -> RateLimitedClientBuilder {
        RateLimitedClientBuilder {
            capacity: 10,
            window: Duration::from_secs(1),
            endpoint: None,
            clock: None,
            dispatcher: DispatcherConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            start: None,
        }
    }

    /// Submit `document` signed with `signature`, if the window allows it.
    ///
    /// Returns as soon as the decision is made; the network call runs on a
    /// worker.
    ///
    /// # Errors
    /// Returns a `DispatchError` if the call was admitted but could not be
    /// queued. The admission slot is spent either way.
    pub fn process(
        &self,
        document: Document,
        signature: impl Into<String>,
    ) -> Result<Admission, DispatchError> {
        self.process_request(SubmissionRequest::new(document, signature))
    }

    /// Like `process`, for an already assembled request.
    pub fn process_request(&self, request: SubmissionRequest) -> Result<Admission, DispatchError> {
        match self.gate.try_admit(self.clock.now()) {
            AdmissionDecision::Admitted => self
                .dispatcher
                .submit(SubmissionTask::new(request))
                .map(Admission::Admitted),
            AdmissionDecision::Rejected => Ok(Admission::Rejected),
        }
    }

    /// Stop accepting submissions and wait for queued ones to finish.
    pub async fn shutdown(&self) -> Result<(), ShutdownError> {
        self.dispatcher.shutdown().await
    }

    /// Get a reference to the admission gate.
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Get a reference to the dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Metrics shared by the gate and the dispatcher.
    pub fn metrics(&self) -> &Metrics {
        self.gate.metrics()
    }
}
