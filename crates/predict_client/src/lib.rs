//! Client side of the stress prediction service.
//!
//! This crate provides:
//! - PredictConfig: where to send answers and how long to wait
//! - Transport: the seam over the HTTP stack (reqwest natively, fetch in the browser)
//! - submit: one POST of the survey, settled into an [`Outcome`]
//! - FormController: the idle/loading/result state behind the form

mod controller;
#[cfg(feature = "native")]
mod native;

pub use controller::{BUTTON_IDLE, BUTTON_LOADING, FormAction, FormController};
#[cfg(feature = "native")]
pub use native::ReqwestTransport;

use std::time::Duration;
use survey_types::{FormState, Outcome};
use thiserror::Error;

/// Prediction endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://student-stress-backend.onrender.com/predict";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "STRESS_PREDICT_URL";

/// Errors from moving a request over the wire.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Fetch failed: {0}")]
    Fetch(String),
}

/// Configuration for talking to the prediction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictConfig {
    /// Full URL of the predict endpoint
    pub endpoint: String,
    /// Request timeout (default: 30s natively, none in the browser)
    pub timeout: Option<Duration>,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: if cfg!(target_arch = "wasm32") {
                None
            } else {
                Some(Duration::from_secs(30))
            },
        }
    }
}

impl PredictConfig {
    /// Default config with the endpoint taken from `STRESS_PREDICT_URL` when set.
    pub fn from_env() -> Self {
        Self::default().with_endpoint_override(std::env::var(ENDPOINT_ENV).ok())
    }

    /// Replace the endpoint when `endpoint` is set and not blank.
    pub fn with_endpoint_override(self, endpoint: Option<String>) -> Self {
        match endpoint {
            Some(endpoint) if !endpoint.trim().is_empty() => self.with_endpoint(endpoint),
            _ => self,
        }
    }

    /// Replace the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Status and body of an HTTP reply, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawReply {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one JSON POST and hands back the reply untouched.
///
/// Implementations must send `Content-Type: application/json` and must
/// not retry.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_json(&self, url: &str, body: String) -> Result<RawReply, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn post_json(&self, url: &str, body: String) -> Result<RawReply, TransportError> {
        (**self).post_json(url, body).await
    }
}

/// Submit the survey once and settle the reply.
///
/// Never fails: every transport or decoding problem becomes
/// [`Outcome::Unreachable`], logged at warn level with its detail.
pub async fn submit<T: Transport>(transport: &T, config: &PredictConfig, form: &FormState) -> Outcome {
    let body = match serde_json::to_string(form) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode survey answers");
            return Outcome::Unreachable;
        }
    };

    tracing::debug!(endpoint = %config.endpoint, "submitting survey answers");

    match transport.post_json(&config.endpoint, body).await {
        Ok(reply) => {
            let outcome = Outcome::from_reply(reply.is_success(), &reply.body);
            if outcome == Outcome::Unreachable {
                tracing::warn!(status = reply.status, "prediction reply was not valid JSON");
            } else {
                tracing::debug!(status = reply.status, ?outcome, "prediction settled");
            }
            outcome
        }
        Err(e) => {
            tracing::warn!(error = %e, endpoint = %config.endpoint, "prediction request failed");
            Outcome::Unreachable
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Transport double that replays scripted replies and records requests.
    #[derive(Default)]
    pub struct ScriptedTransport {
        replies: RefCell<VecDeque<Result<RawReply, TransportError>>>,
        pub requests: RefCell<Vec<(String, String)>>,
    }

    impl ScriptedTransport {
        pub fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(RawReply {
                status,
                body: body.as_bytes().to_vec(),
            }));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(TransportError::Fetch(message.to_string())));
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        async fn post_json(&self, url: &str, body: String) -> Result<RawReply, TransportError> {
            self.requests.borrow_mut().push((url.to_string(), body));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Fetch("no scripted reply".to_string())))
        }
    }
}
