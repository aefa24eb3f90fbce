//! Shared cache store backed by Redis/KeyDB.
//!
//! Several server processes pointed at the same instance see one keyspace,
//! so an invalidation issued by any of them is visible to all.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use fred::clients::Pool;
use fred::interfaces::{ClientLike, KeysInterface};
use fred::types::config::{Config as RedisConfig, ReconnectPolicy};
use fred::types::{Builder, Expiration, Value};
use tracing::trace;

use super::store::{CacheError, CacheStore};

const POOL_SIZE: usize = 4;

/// Seconds for `SET ... EX`: at least 1, which Redis requires, and never wrapped negative
fn expiry_secs(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs().max(1)).unwrap_or(i64::MAX)
}

fn backend_error(context: &str, e: impl std::fmt::Display) -> CacheError {
    CacheError::Backend(format!("{}: {}", context, e))
}

pub struct RedisCacheStore {
    pool: Pool,
}

impl RedisCacheStore {
    /// Connect and verify the pool before returning it.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let config = RedisConfig::from_url(url).map_err(|e| backend_error("invalid url", e))?;

        let mut builder = Builder::from_config(config);
        // Exponential reconnect: initial 0ms, base 100ms, max 30s, factor 2.
        builder.set_policy(ReconnectPolicy::new_exponential(0, 100, 30_000, 2));

        let pool = builder
            .build_pool(POOL_SIZE)
            .map_err(|e| backend_error("failed to build pool", e))?;
        pool.init()
            .await
            .map_err(|e| backend_error("failed to connect", e))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let value: Value = self
            .pool
            .get(key)
            .await
            .map_err(|e| backend_error("GET failed", e))?;

        if value.is_null() {
            return Ok(None);
        }
        trace!(key, "redis cache hit");
        Ok(value.as_bytes().map(<[u8]>::to_vec))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let ttl_secs = expiry_secs(ttl);
        let _: () = self
            .pool
            .set(
                key,
                Value::Bytes(Bytes::from(value)),
                Some(Expiration::EX(ttl_secs)),
                None,
                false,
            )
            .await
            .map_err(|e| backend_error("SET failed", e))?;
        trace!(key, ttl_secs, "redis cache set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let removed: i64 = self
            .pool
            .del(key)
            .await
            .map_err(|e| backend_error("DEL failed", e))?;
        trace!(key, removed, "redis cache delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_secs_rounds_up_to_one_second() {
        assert_eq!(expiry_secs(Duration::from_millis(200)), 1);
        assert_eq!(expiry_secs(Duration::from_secs(3600)), 3600);
    }

    #[test]
    fn test_expiry_secs_saturates_instead_of_wrapping() {
        assert_eq!(expiry_secs(Duration::from_secs(u64::MAX)), i64::MAX);
        assert_eq!(expiry_secs(Duration::MAX), i64::MAX);
    }
}
