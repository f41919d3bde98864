//! Redis cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::{CacheKeyGenerator, DigestKeyGenerator, LlmCache, ReturnValue};
use crate::domain::DomainError;

/// Default namespace for replay slots
pub const DEFAULT_KEY_PREFIX: &str = "llm:replay";

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Lifetime of stored entries; `None` keeps them until cleared
    pub time_to_live: Option<Duration>,
    /// Key prefix for namespacing; `clear` only touches keys under it
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            time_to_live: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the time-to-live of stored entries
    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

/// Redis-backed LLM cache
///
/// Each (prompt, llm_string) pair maps to `<prefix>:<sha256>` holding the
/// JSON-encoded value.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
    key_generator: DigestKeyGenerator,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Creates a new Redis cache connection
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self {
            connection,
            config,
            key_generator: DigestKeyGenerator::new(),
        })
    }

    fn slot_key(&self, prompt: &str, llm_string: &str) -> String {
        slot_key(&self.key_generator, &self.config.key_prefix, prompt, llm_string)
    }

    /// Number of keys under this cache's prefix
    pub async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.scan_keys().await?.len())
    }

    async fn scan_keys(&self) -> Result<Vec<String>, DomainError> {
        let pattern = format!("{}:*", self.config.key_prefix);
        let mut conn = self.connection.clone();
        let mut cursor = 0u64;
        let mut found = Vec::new();

        // SCAN rather than KEYS so large databases are not blocked
        loop {
            let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!(
                        "Failed to scan keys with pattern '{}': {}",
                        pattern, e
                    ))
                })?;

            found.extend(keys);
            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        Ok(found)
    }
}

fn slot_key(
    generator: &DigestKeyGenerator,
    prefix: &str,
    prompt: &str,
    llm_string: &str,
) -> String {
    generator.generate_with_namespace(prefix, prompt, llm_string)
}

#[async_trait]
impl LlmCache for RedisCache {
    async fn lookup(
        &self,
        prompt: &str,
        llm_string: &str,
    ) -> Result<Option<ReturnValue>, DomainError> {
        let key = self.slot_key(prompt, llm_string);
        let mut conn = self.connection.clone();

        let raw: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to get key '{}': {}", key, e)))?;

        raw.map(|data| {
            serde_json::from_str(&data).map_err(|e| {
                DomainError::cache(format!("Failed to deserialize cache value: {}", e))
            })
        })
        .transpose()
    }

    async fn store(
        &self,
        prompt: &str,
        llm_string: &str,
        value: ReturnValue,
    ) -> Result<(), DomainError> {
        let key = self.slot_key(prompt, llm_string);
        let mut conn = self.connection.clone();

        let data = serde_json::to_string(&value)
            .map_err(|e| DomainError::cache(format!("Failed to serialize cache value: {}", e)))?;

        let result: redis::RedisResult<()> = match self.config.time_to_live {
            Some(ttl) => conn.set_ex(&key, data, ttl.as_secs().max(1)).await,
            None => conn.set(&key, data).await,
        };

        result.map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let keys = self.scan_keys().await?;
        let mut conn = self.connection.clone();

        for batch in keys.chunks(100) {
            let _: i64 = conn
                .del(batch)
                .await
                .map_err(|e| DomainError::cache(format!("Failed to delete keys: {}", e)))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::Generation;

    // Note: These tests require a running Redis instance
    // Run with: cargo test -- --ignored

    fn get_test_config() -> RedisCacheConfig {
        RedisCacheConfig::new("redis://127.0.0.1:6379").with_key_prefix("test:replay")
    }

    fn value(text: &str) -> ReturnValue {
        vec![Generation::new(text)]
    }

    #[test]
    fn test_config_defaults() {
        let config = RedisCacheConfig::default();

        assert_eq!(config.key_prefix, DEFAULT_KEY_PREFIX);
        assert!(config.time_to_live.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = RedisCacheConfig::new("redis://localhost")
            .with_key_prefix("myapp")
            .with_time_to_live(Duration::from_secs(600));

        assert_eq!(config.url, "redis://localhost");
        assert_eq!(config.key_prefix, "myapp");
        assert_eq!(config.time_to_live, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_slot_key_is_namespaced_digest() {
        let generator = DigestKeyGenerator::new();

        let key = slot_key(&generator, "myapp", "Hello!", "cfg_replay_0");
        let other = slot_key(&generator, "myapp", "Hello!", "cfg_replay_1");

        assert!(key.starts_with("myapp:"));
        assert_ne!(key, other);
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_store_and_lookup() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

        cache.store("Hello!", "cfg", value("One")).await.unwrap();

        let result = cache.lookup("Hello!", "cfg").await.unwrap();
        assert_eq!(result, Some(value("One")));

        cache.clear().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_clear_only_touches_prefix() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        let neighbour = RedisCache::new(get_test_config().with_key_prefix("test:other"))
            .await
            .unwrap();

        cache.store("Hello!", "cfg", value("One")).await.unwrap();
        neighbour.store("Hello!", "cfg", value("Kept")).await.unwrap();

        cache.clear().await.unwrap();

        assert_eq!(cache.len().await.unwrap(), 0);
        assert_eq!(
            neighbour.lookup("Hello!", "cfg").await.unwrap(),
            Some(value("Kept"))
        );

        neighbour.clear().await.unwrap();
    }
}
