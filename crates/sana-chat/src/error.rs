//! Chat client errors.

use thiserror::Error;

/// Errors from the remote chat endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request exceeded its deadline.
    #[error("Request timed out")]
    Timeout,

    /// The endpoint could not be reached.
    #[error("Could not connect to server")]
    Connect,

    /// The endpoint answered with a non-success status.
    #[error("HTTP error: {0}")]
    Http(u16),

    /// The response body did not contain a recognizable answer.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect
        } else if let Some(status) = e.status() {
            Self::Http(status.as_u16())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Internal failures the session controller absorbs (logged, never
/// propagated to the presentation layer).
#[derive(Debug, Error)]
pub enum ChatError {
    /// Storage read or write failed.
    #[error("Storage error: {0}")]
    Store(#[from] sana_store::StoreError),

    /// Persisted payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
