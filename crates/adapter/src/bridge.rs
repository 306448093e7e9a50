//! HTTP client for the local OBS bridge.
//!
//! One [`BridgeClient`] is built at startup and shared by every invocation. Each call is a single
//! `POST` attempt; there is no retry and no caching.

use crate::config::BridgeSettings;
use crate::error::{AdapterError, Result};
use crate::tools::BridgeRequest;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why a bridge call did not succeed. The `Display` text is what the agent sees.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeFailure {
    /// The request could not be sent or the response could not be received.
    #[error("network error: {message}")]
    Network { message: String },

    /// No response within the configured deadline.
    #[error("network error: bridge did not respond within {}ms", .after.as_millis())]
    Timeout { after: Duration },

    /// The bridge answered with a non-2xx status.
    #[error("bridge error ({status}): {body}")]
    Status { status: u16, body: String },
}

impl From<reqwest::Error> for BridgeFailure {
    fn from(value: reqwest::Error) -> Self {
        Self::Network {
            message: error_chain(&value),
        }
    }
}

/// Render an error with all of its sources, e.g.
/// `error sending request for url (...): client error (Connect): tcp connect error: Connection refused`.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}

#[derive(Debug, Clone)]
pub struct BridgeClient {
    settings: BridgeSettings,
    client: Client,
}

impl BridgeClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: BridgeSettings) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AdapterError::Startup(format!("build HTTP client: {e}")))?;
        Ok(Self { settings, client })
    }

    #[must_use]
    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Send one request to the bridge.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeFailure`] for transport errors, timeouts and non-2xx replies.
    pub async fn send(&self, request: &BridgeRequest) -> std::result::Result<(), BridgeFailure> {
        let fut = self.post(request);
        if let Some(t) = self.settings.timeout.filter(|t| *t > Duration::from_millis(0)) {
            match tokio::time::timeout(t, fut).await {
                Ok(r) => r,
                Err(_) => Err(BridgeFailure::Timeout { after: t }),
            }
        } else {
            fut.await
        }
    }

    async fn post(&self, request: &BridgeRequest) -> std::result::Result<(), BridgeFailure> {
        let url = self.settings.endpoint_url(request.endpoint);
        let response = self.client.post(url).json(&request.body).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => format!("<unreadable response body: {}>", error_chain(&e)),
        };
        Err(BridgeFailure::Status {
            status: status.as_u16(),
            body,
        })
    }
}
