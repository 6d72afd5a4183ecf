//! Storage errors.

use thiserror::Error;

/// Errors from the key-value storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters the backend cannot map to a location.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}
