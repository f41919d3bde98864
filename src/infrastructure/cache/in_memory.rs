//! In-memory cache implementation using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::{LlmCache, ReturnValue};
use crate::domain::DomainError;

/// Configuration for in-memory cache
///
/// Everything is unbounded by default: an evicted slot would end a recorded
/// sequence early.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: Option<u64>,
    /// Lifetime of an entry after it is stored
    pub time_to_live: Option<Duration>,
    /// Entries not accessed for this duration are evicted
    pub time_to_idle: Option<Duration>,
}

impl InMemoryCacheConfig {
    /// Sets the maximum capacity
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the time-to-live duration
    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    /// Sets the time-to-idle duration
    pub fn with_time_to_idle(mut self, tti: Duration) -> Self {
        self.time_to_idle = Some(tti);
        self
    }
}

/// Thread-safe in-memory LLM cache backed by moka
///
/// Entries are keyed by the exact (prompt, llm_string) pair.
#[derive(Debug)]
pub struct InMemoryCache {
    cache: MokaCache<(String, String), ReturnValue>,
    config: InMemoryCacheConfig,
}

impl InMemoryCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let mut builder = MokaCache::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(ttl) = config.time_to_live {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        Self {
            cache: builder.build(),
            config,
        }
    }

    pub fn config(&self) -> &InMemoryCacheConfig {
        &self.config
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmCache for InMemoryCache {
    async fn lookup(
        &self,
        prompt: &str,
        llm_string: &str,
    ) -> Result<Option<ReturnValue>, DomainError> {
        let key = (prompt.to_string(), llm_string.to_string());
        Ok(self.cache.get(&key).await)
    }

    async fn store(
        &self,
        prompt: &str,
        llm_string: &str,
        value: ReturnValue,
    ) -> Result<(), DomainError> {
        let key = (prompt.to_string(), llm_string.to_string());
        self.cache.insert(key, value).await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::Generation;

    fn value(text: &str) -> ReturnValue {
        vec![Generation::new(text)]
    }

    #[tokio::test]
    async fn test_store_and_lookup() {
        let cache = InMemoryCache::new();

        cache.store("Hello!", "cfg", value("One")).await.unwrap();

        let result = cache.lookup("Hello!", "cfg").await.unwrap();
        assert_eq!(result, Some(value("One")));
    }

    #[tokio::test]
    async fn test_lookup_missing() {
        let cache = InMemoryCache::new();

        let result = cache.lookup("missing", "cfg").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_store_overwrites() {
        let cache = InMemoryCache::new();

        cache.store("Hello!", "cfg", value("One")).await.unwrap();
        cache.store("Hello!", "cfg", value("Two")).await.unwrap();

        let result = cache.lookup("Hello!", "cfg").await.unwrap();
        assert_eq!(result, Some(value("Two")));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_prompt_and_config_stay_separate() {
        let cache = InMemoryCache::new();

        cache.store("ab", "c", value("first")).await.unwrap();

        assert!(cache.lookup("a", "bc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryCache::new();

        cache.store("Hello!", "cfg", value("One")).await.unwrap();
        cache.store("Bye!", "cfg", value("Two")).await.unwrap();

        cache.clear().await.unwrap();

        assert!(cache.is_empty().await);
        assert!(cache.lookup("Hello!", "cfg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let config = InMemoryCacheConfig::default().with_time_to_live(Duration::from_millis(50));
        let cache = InMemoryCache::with_config(config);

        cache.store("Hello!", "cfg", value("One")).await.unwrap();
        assert!(cache.lookup("Hello!", "cfg").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.lookup("Hello!", "cfg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generation_info_round_trips() {
        let cache = InMemoryCache::new();
        let stored = vec![
            Generation::new("One").with_info(serde_json::json!({"finish_reason": "stop"})),
        ];

        cache.store("Hello!", "cfg", stored.clone()).await.unwrap();

        assert_eq!(cache.lookup("Hello!", "cfg").await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_config() {
        let config = InMemoryCacheConfig::default()
            .with_max_capacity(100)
            .with_time_to_live(Duration::from_secs(300))
            .with_time_to_idle(Duration::from_secs(60));

        let cache = InMemoryCache::with_config(config);

        assert_eq!(cache.config().max_capacity, Some(100));
        assert_eq!(cache.config().time_to_live, Some(Duration::from_secs(300)));
        assert_eq!(cache.config().time_to_idle, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_default_config_is_unbounded() {
        let config = InMemoryCacheConfig::default();

        assert!(config.max_capacity.is_none());
        assert!(config.time_to_live.is_none());
        assert!(config.time_to_idle.is_none());
    }
}
