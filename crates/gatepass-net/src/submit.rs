//! Check-in submission
//!
//! One POST per `submit` call, no retries; retrying is the workflow
//! controller's prerogative. The simulated client is a drop-in
//! substitute with the identical contract, for offline development.

use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Public echo endpoint used when no override is configured
pub const DEFAULT_ENDPOINT_URL: &str = "https://httpbin.org/post";

/// Default bound on one submission round-trip
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Completion message used when the server supplies none
pub const DEFAULT_SUCCESS_MESSAGE: &str = "QR check-in complete.";

/// Client device description carried with each submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Client identification string
    pub user_agent: String,
    /// Operating system name
    pub platform: String,
}

impl DeviceInfo {
    /// Describe the running client
    pub fn detect() -> Self {
        Self {
            user_agent: format!("gatepass/{}", env!("CARGO_PKG_VERSION")),
            platform: std::env::consts::OS.to_string(),
        }
    }
}

/// Wire body of one check-in POST
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInSubmission {
    /// Transport-safe ciphertext of the scanned payload
    pub encrypted_data: String,
    /// Client submission time, ISO-8601
    pub timestamp: String,
    /// Submitting device description
    pub device_info: DeviceInfo,
}

impl CheckInSubmission {
    /// Body for the given ciphertext, stamped now
    pub fn new(encrypted_data: String) -> Self {
        Self {
            encrypted_data,
            timestamp: Utc::now().to_rfc3339(),
            device_info: DeviceInfo::detect(),
        }
    }
}

/// Server acknowledgement of one accepted submission
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInAck {
    /// Server-supplied completion message
    pub message: String,
    /// Echo field read from the response body, if any
    pub echoed: Option<serde_json::Value>,
}

/// Transport capable of carrying one check-in submission
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    /// Send one submission; exactly one attempt per call
    async fn submit(&self, submission: &CheckInSubmission) -> Result<CheckInAck>;
}

/// HTTP submission client
pub struct HttpSubmissionClient {
    endpoint: String,
    request_timeout: Duration,
    client: reqwest::Client,
}

impl HttpSubmissionClient {
    /// Client for the given endpoint with the default request timeout
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Client with an explicit request timeout
    pub fn with_timeout(endpoint: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            request_timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Target endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    async fn submit(&self, submission: &CheckInSubmission) -> Result<CheckInAck> {
        debug!("submitting check-in to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.request_timeout)
            .json(submission)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!("check-in rejected: status {}", status);
            return Err(Error::Http(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        debug!("check-in accepted by {}", self.endpoint);
        Ok(ack_from_body(&body))
    }
}

fn map_transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(error.to_string())
    }
}

/// Read the optional message and echo fields out of a 2xx response
/// body.
///
/// HTTP 200 is success regardless of body shape beyond being JSON; the
/// echo field mirrors what the endpoint returns (httpbin echoes the
/// submitted body under `json`).
fn ack_from_body(body: &serde_json::Value) -> CheckInAck {
    let message = body
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or(DEFAULT_SUCCESS_MESSAGE)
        .to_string();
    let echoed = body.get("json").cloned().filter(|v| !v.is_null());
    CheckInAck { message, echoed }
}

/// Drop-in submission client for offline development.
///
/// Injects a fixed latency and fails a fraction of submissions to
/// exercise the failure path without a network.
pub struct SimulatedSubmissionClient {
    latency: Duration,
    failure_rate: f64,
}

impl SimulatedSubmissionClient {
    /// Simulator with the stock latency and a 10% synthetic failure
    /// rate
    pub fn new() -> Self {
        Self::with_behavior(Duration::from_millis(800), 0.1)
    }

    /// Simulator with explicit latency and failure rate
    pub fn with_behavior(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

impl Default for SimulatedSubmissionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionClient for SimulatedSubmissionClient {
    async fn submit(&self, submission: &CheckInSubmission) -> Result<CheckInAck> {
        debug!("simulating check-in submission");
        tokio::time::sleep(self.latency).await;

        if rand::thread_rng().gen_bool(self.failure_rate) {
            warn!("synthetic submission failure injected");
            return Err(Error::Network("simulated submission failure".to_string()));
        }

        Ok(CheckInAck {
            message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            echoed: Some(serde_json::json!({
                "encryptedData": submission.encrypted_data,
            })),
        })
    }
}
