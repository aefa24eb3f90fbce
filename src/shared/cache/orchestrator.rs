use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use super::keys::{CacheKey, CacheTag};
use super::store::{CacheError, CacheStore};

/// Get-or-compute access to cached views, plus explicit invalidation.
///
/// The cache is an optimization only: a failing store read is treated as a
/// miss and a failing store write is logged and dropped. Compute failures
/// always reach the caller and are never cached. Concurrent misses on one key
/// may each compute and overwrite; computations are idempotent reads.
#[derive(Clone)]
pub struct CacheOrchestrator {
    store: Arc<dyn CacheStore>,
    prefix: String,
    default_ttl: Duration,
}

impl std::fmt::Debug for CacheOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheOrchestrator")
            .field("store", &"<dyn CacheStore>")
            .field("prefix", &self.prefix)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl CacheOrchestrator {
    pub fn new(store: Arc<dyn CacheStore>, prefix: impl Into<String>, default_ttl: Duration) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            default_ttl,
        }
    }

    /// TTL configured for every view
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn store_key(&self, key: CacheKey) -> String {
        format!("{}{}", self.prefix, key.as_str())
    }

    /// Return the cached value for `key`, or run `compute`, cache its result for `ttl`, and return it.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: CacheKey,
        ttl: Duration,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let store_key = self.store_key(key);

        match self.store.get(&store_key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    tracing::debug!(key = %store_key, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(key = %store_key, error = %e, "cached value unreadable, recomputing");
                }
            },
            Ok(None) => tracing::debug!(key = %store_key, "cache miss"),
            Err(e) => {
                tracing::warn!(key = %store_key, error = %e, "cache read failed, falling through to store");
            }
        }

        let value = compute().await?;

        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if let Err(e) = self.store.set(&store_key, bytes, ttl).await {
                    tracing::warn!(key = %store_key, error = %e, "cache write failed");
                }
            }
            Err(e) => {
                tracing::warn!(key = %store_key, error = %e, "value not serializable, not cached");
            }
        }

        Ok(value)
    }

    /// Remove one cached view immediately
    pub async fn invalidate(&self, key: CacheKey) -> Result<(), CacheError> {
        let store_key = self.store_key(key);
        self.store.delete(&store_key).await?;
        tracing::debug!(key = %store_key, "cache invalidated");
        Ok(())
    }

    /// Remove every view grouped under `tag`.
    ///
    /// `created_id` names the row whose write triggered this, for the log.
    /// All keys are attempted even when one delete fails; the first failure is returned.
    pub async fn invalidate_by_tag(
        &self,
        tag: CacheTag,
        created_id: Option<i64>,
    ) -> Result<(), CacheError> {
        let mut first_error = None;
        for key in tag.keys() {
            if let Err(e) = self.invalidate(*key).await {
                tracing::error!(tag = %tag, key = %key, error = %e, "cache invalidation failed");
                first_error.get_or_insert(e);
            }
        }

        tracing::info!(tag = %tag, created_id = ?created_id, "cache tag invalidated");

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Invalidate after a committed write; a failure only leaves the view stale until its TTL.
    pub async fn invalidate_after_write(&self, tag: CacheTag, created_id: Option<i64>) {
        if let Err(e) = self.invalidate_by_tag(tag, created_id).await {
            tracing::error!(
                tag = %tag,
                error = %e,
                "write committed but cache invalidation failed; views stay stale until TTL"
            );
        }
    }
}
