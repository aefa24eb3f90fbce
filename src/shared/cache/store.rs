use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Key-value store with per-key TTL.
///
/// Expiry is enforced by the store itself. Implementations must be safe to
/// share across requests; each call is atomic on its own key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns `None` for absent or expired keys
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Deleting an absent key is not an error
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
