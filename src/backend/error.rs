//! Errors raised while talking to the query backend.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("backend unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    /// An endpoint URL could not be built from the configured base URL.
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Whether the failure happened before any response arrived.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
