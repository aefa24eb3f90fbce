#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use crate::core::config::AuthConfig;
#[cfg(test)]
use crate::shared::cache::{CacheKey, CacheOrchestrator, CacheStore, MemoryCacheStore};

#[cfg(test)]
pub const TEST_KEY_PREFIX: &str = "test:";

#[cfg(test)]
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-with-enough-entropy".to_string(),
        issuer: "webdir-test".to_string(),
        jwt_leeway: Duration::from_secs(0),
    }
}

/// Sign an HS256 token the way the admin panel's identity provider would
#[cfg(test)]
pub fn issue_token(config: &AuthConfig, sub: &str, roles: &[&str], expires_in_secs: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let exp = chrono::Utc::now().timestamp() + expires_in_secs;
    let claims = serde_json::json!({
        "sub": sub,
        "iss": config.issuer,
        "iat": chrono::Utc::now().timestamp(),
        "exp": exp,
        "roles": roles,
    });

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap()
}

/// In-memory cache wired the way `main` wires the real one
#[cfg(test)]
pub fn test_cache() -> (Arc<MemoryCacheStore>, CacheOrchestrator) {
    let store = Arc::new(MemoryCacheStore::default());
    let orchestrator =
        CacheOrchestrator::new(store.clone(), TEST_KEY_PREFIX, Duration::from_secs(3600));
    (store, orchestrator)
}

/// Whether `key` currently holds a live entry in a store built by [`test_cache`]
#[cfg(test)]
pub async fn is_cached(store: &MemoryCacheStore, key: CacheKey) -> bool {
    let stored_key = format!("{}{}", TEST_KEY_PREFIX, key);
    matches!(store.get(&stored_key).await, Ok(Some(_)))
}
