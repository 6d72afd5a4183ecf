//! The key-value storage seam.

use async_trait::async_trait;

use crate::error::StoreError;

/// Asynchronous string-keyed storage.
///
/// The session controller treats this as an external
/// append/overwrite-by-key resource with no transactional guarantees.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value stored under `key`. Removing a missing key is
    /// not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// List all stored keys. Diagnostics only.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;
}
