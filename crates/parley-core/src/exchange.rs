//! HTTP client for the message-exchange endpoint.
//!
//! The endpoint accepts `POST {"message": "..."}` and answers
//! `{"reply": "..."}`. Anything else is routed through [`ExchangeError`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bound on how long one exchange may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How much of an unparseable body to carry into an error message.
const BODY_PREVIEW_LEN: usize = 120;

/// Client for the message-exchange endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ExchangeRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExchangeReply {
    reply: String,
}

/// Error body shape the server emits on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ServerError {
    error: Option<String>,
}

impl ExchangeClient {
    /// Create a client with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ExchangeError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExchangeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExchangeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// The endpoint URL this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one message and return the server's reply text.
    ///
    /// Exactly one request is issued; there are no retries. A timeout
    /// surfaces as a failure through the same path as any other error.
    pub async fn send(&self, text: &str) -> Result<String, ExchangeError> {
        tracing::debug!(endpoint = %self.endpoint, "sending message");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ExchangeRequest { message: text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExchangeError::Timeout(self.timeout.as_secs())
                } else if e.is_connect() {
                    ExchangeError::Connection(e.to_string())
                } else {
                    ExchangeError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        // Non-2xx is a failure even when the body parses; the server's
        // error shape has no reply field.
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "exchange rejected");
            return Err(ExchangeError::Status {
                code: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        parse_reply(&body)
    }
}

/// Extract the `reply` field from a success body.
pub fn parse_reply(body: &str) -> Result<String, ExchangeError> {
    let parsed: ExchangeReply = serde_json::from_str(body)
        .map_err(|_| ExchangeError::MalformedReply(preview(body)))?;
    Ok(parsed.reply)
}

/// Pull the server's `{"error": ...}` detail out of a failure body, if any.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ServerError>(body)
        .ok()
        .and_then(|e| e.error)
        .unwrap_or_else(|| preview(body))
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_PREVIEW_LEN {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(BODY_PREVIEW_LEN).collect();
        format!("{cut}...")
    }
}

/// Errors that can occur during a message exchange.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// Failed to construct the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// The request exceeded its deadline.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Could not connect to the endpoint.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Any other transport failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("server returned status {code}: {detail}")]
    Status { code: u16, detail: String },

    /// The success body was not `{"reply": <string>}`.
    #[error("malformed reply body: {0}")]
    MalformedReply(String),
}
