//! Cache Module
//!
//! Key-value storage for each user's last response. Production runs talk to
//! a memcached pool; without one, an in-process map is used.

mod memcached;
mod memory;


use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::CacheError;

// Re-export public types
pub use memcached::{wire_key, MemcachedCache};
pub use memory::MemoryCache;

// == Public Constants ==
/// Maximum key length accepted by memcached, in bytes
pub const MAX_KEY_LENGTH: usize = 250;

// == Response Cache Trait ==
/// Plain get/set over string values.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Returns the stored value, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

/// Serializes `value` as JSON and stores it under `key`.
pub async fn store_json<T: Serialize + Sync>(
    cache: &dyn ResponseCache,
    key: &str,
    value: &T,
) -> Result<(), CacheError> {
    let encoded = serde_json::to_string(value)?;
    cache.set(key, &encoded).await
}

/// Loads the JSON stored under `key`; a miss yields `Value::Null`.
pub async fn load_json(cache: &dyn ResponseCache, key: &str) -> Result<Value, CacheError> {
    match cache.get(key).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Value::Null),
    }
}

/// Builds the cache backend selected by the configuration.
pub fn from_config(config: &Config) -> Result<Arc<dyn ResponseCache>, CacheError> {
    if config.cache_servers.is_empty() {
        return Ok(Arc::new(MemoryCache::new()));
    }

    let cache = MemcachedCache::new(config.cache_servers.clone(), config.cache_timeout())?;
    Ok(Arc::new(cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_json_roundtrip() {
        let cache = MemoryCache::new();
        let response = json!({ "odd": ["a"], "even": [] });

        store_json(&cache, "alice", &response).await.unwrap();
        assert_eq!(load_json(&cache, "alice").await.unwrap(), response);
    }

    #[tokio::test]
    async fn test_load_json_miss_is_null() {
        let cache = MemoryCache::new();
        assert_eq!(load_json(&cache, "nobody").await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_load_json_corrupt_value() {
        let cache = MemoryCache::new();
        cache.set("alice", "not json").await.unwrap();

        let result = load_json(&cache, "alice").await;
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[test]
    fn test_from_config_without_servers() {
        assert!(from_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_from_config_with_servers() {
        let config = Config {
            cache_servers: vec!["127.0.0.1:11211".to_string()],
            ..Config::default()
        };
        assert!(from_config(&config).is_ok());
    }
}
