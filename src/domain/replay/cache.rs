//! Sequenced replay cache
//!
//! Wraps any [`LlmCache`] and turns each (prompt, llm_string) pair into an
//! ordered series of slots. The wrapped cache sees the configuration
//! string suffixed with the slot position (see [`LogicalKey::at`]), so a
//! fresh wrapper over a previously filled cache hands back the recorded
//! values in the order they were first stored. Once the recorded series
//! for a pair runs out, lookups miss and the caller's next store extends it.
//!
//! Callers follow the usual cache protocol: `lookup`, and on a miss compute
//! a value and `store` it under the same pair before touching that pair
//! again. A `store` without a preceding miss overwrites the value at the
//! current position and moves past it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::counter::CounterTable;
use crate::domain::cache::{LlmCache, LogicalKey, ReturnValue};
use crate::domain::DomainError;

/// Replay layer over a wrapped cache
#[derive(Debug)]
pub struct ReplayCache {
    inner: Arc<dyn LlmCache>,
    table: RwLock<CounterTable>,
}

impl ReplayCache {
    /// Creates a replay cache with an empty counter table
    pub fn new(inner: Arc<dyn LlmCache>) -> Self {
        Self {
            inner,
            table: RwLock::new(CounterTable::new()),
        }
    }

    /// Returns the value at the key's current position, advancing on a hit
    pub async fn lookup_key(&self, key: &LogicalKey) -> Result<Option<ReturnValue>, DomainError> {
        let table = self.table.read().await;
        let slot = table.slot(key).await;
        let mut position = slot.lock().await;

        let physical = key.at(*position);
        let value = self
            .inner
            .lookup(physical.prompt(), physical.llm_string())
            .await?;

        match value {
            Some(value) => {
                debug!(key = %key, position = *position, "replay hit");
                *position += 1;
                Ok(Some(value))
            }
            None => {
                debug!(key = %key, position = *position, "replay miss");
                Ok(None)
            }
        }
    }

    /// Records `value` at the key's current position and advances
    pub async fn store_key(&self, key: &LogicalKey, value: ReturnValue) -> Result<(), DomainError> {
        let table = self.table.read().await;
        let slot = table.slot(key).await;
        let mut position = slot.lock().await;

        let physical = key.at(*position);
        self.inner
            .store(physical.prompt(), physical.llm_string(), value)
            .await?;

        debug!(key = %key, position = *position, "replay slot recorded");
        *position += 1;
        Ok(())
    }

    /// Position the next lookup or store for `key` will use
    pub async fn position(&self, key: &LogicalKey) -> u64 {
        self.table.read().await.position(key).await
    }

    /// Number of logical keys touched since construction or the last clear
    pub async fn tracked_keys(&self) -> usize {
        self.table.read().await.len().await
    }
}

#[async_trait]
impl LlmCache for ReplayCache {
    async fn lookup(
        &self,
        prompt: &str,
        llm_string: &str,
    ) -> Result<Option<ReturnValue>, DomainError> {
        self.lookup_key(&LogicalKey::new(prompt, llm_string)).await
    }

    async fn store(
        &self,
        prompt: &str,
        llm_string: &str,
        value: ReturnValue,
    ) -> Result<(), DomainError> {
        self.store_key(&LogicalKey::new(prompt, llm_string), value)
            .await
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut table = self.table.write().await;
        *table = CounterTable::new();
        debug!("replay counters reset");

        self.inner.clear().await
    }
}
