//! Read-through cache sitting in front of the relational store.
//!
//! Every public aggregate view owns one fixed [`CacheKey`]. Reads go through
//! [`CacheOrchestrator::get_or_compute`]; writes invalidate the keys grouped
//! under a [`CacheTag`] once the store write has succeeded.

mod keys;
mod memory;
mod orchestrator;
mod redis;
mod store;

use std::sync::Arc;

pub use keys::{CacheKey, CacheTag};
pub use memory::MemoryCacheStore;
pub use orchestrator::CacheOrchestrator;
pub use redis::RedisCacheStore;
pub use store::{CacheError, CacheStore};

use crate::core::config::{CacheBackend, CacheConfig};

/// Build the cache store selected by configuration
pub async fn build_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>, CacheError> {
    match &config.backend {
        CacheBackend::Memory => Ok(Arc::new(MemoryCacheStore::new())),
        CacheBackend::Redis { url } => Ok(Arc::new(RedisCacheStore::connect(url).await?)),
    }
}
