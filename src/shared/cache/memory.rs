use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::store::{CacheError, CacheStore};

struct Entry {
    value: Vec<u8>,
    /// `None` when the TTL reaches past what the clock can represent
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        !matches!(self.expires_at, Some(at) if now >= at)
    }
}

/// Process-local cache store.
///
/// Time is read from `tokio::time`, so a paused test runtime controls expiry.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, expired ones included until they are touched
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it, unless a writer replaced it in between
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now().checked_add(ttl);
        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryCacheStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryCacheStore::new();
        store
            .set("k", b"value".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let store = MemoryCacheStore::new();
        store
            .set("k", b"value".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap(); // absent key is fine
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let store = MemoryCacheStore::new();
        store
            .set("k", b"value".to_vec(), Duration::from_secs(30))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(29)).await;
        assert!(store.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_refreshes_ttl() {
        let store = MemoryCacheStore::new();
        store
            .set("k", b"old".to_vec(), Duration::from_secs(10))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;
        store
            .set("k", b"new".to_vec(), Duration::from_secs(10))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(store.get("k").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_ttl_never_expires() {
        let store = MemoryCacheStore::new();
        store
            .set("k", b"value".to_vec(), Duration::MAX)
            .await
            .unwrap();
        store
            .set("j", b"other".to_vec(), Duration::from_secs(u64::MAX))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;
        assert_eq!(store.get("k").await.unwrap(), Some(b"value".to_vec()));
        assert_eq!(store.get("j").await.unwrap(), Some(b"other".to_vec()));
    }
}
