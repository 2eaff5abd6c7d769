//! Error taxonomy for the admin API client.
//!
//! Every failure carries a numeric status code so call sites can branch on
//! `err.status()` instead of matching variants: 500 for transport/decode
//! problems, 408 for timeouts, 401 for authentication failures, and the
//! server's own status for everything else.

use thiserror::Error;

/// Single error type surfaced by all client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, TLS, or a dropped connection.
    #[error("network error: {0}")]
    Network(String),

    /// The per-request timeout elapsed and the request was aborted.
    #[error("request timed out")]
    Timeout,

    /// 401 that survived the refresh-and-retry cycle (refresh failed, or the
    /// retried request was rejected again).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Any other non-2xx response, carrying the server's status and message.
    #[error("request failed ({status}): {message}")]
    Status {
        status: u16,
        message: String,
        /// Raw parsed error body, when the server sent JSON.
        payload: Option<serde_json::Value>,
    },

    /// A 2xx response whose body could not be (de)serialized as expected.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Status code for branching at call sites.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Network(_) => 500,
            ApiError::Timeout => 408,
            ApiError::Authentication(_) => 401,
            ApiError::Status { status, .. } => *status,
            ApiError::Decode(_) => 500,
        }
    }

    /// Human-readable message, suitable for a toast in the admin console.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Raw server error body, when one was sent and parsed as JSON.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Status { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Classify a transport error from reqwest into the taxonomy.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Pick the best human-readable message out of a server error body.
///
/// Prefers a `detail` field, then `message`, then falls back to the
/// provided default. The backend contract promises one of the two fields
/// on every error response; the fallback covers proxies and crashes that
/// answer with plain text or HTML.
pub(crate) fn server_message(body: &serde_json::Value, fallback: &str) -> String {
    body.get("detail")
        .or_else(|| body.get("message"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| fallback.to_string())
}
