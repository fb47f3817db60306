use async_trait::async_trait;
use std::time::Duration;

/// Key/value storage behind the session context - abstraction over the
/// persistent local store and the cookie jar.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value with optional TTL.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage operation errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Write failed: {0}")]
    Write(String),
}
