//! Per-key sequence positions

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::cache::LogicalKey;

/// Sequence position of one logical key, locked for the whole
/// read-forward-advance cycle of an operation
pub type PositionSlot = Arc<Mutex<u64>>;

/// Mapping from logical key to its next sequence position
///
/// Keys never seen before sit at position 0. Entries are created on first
/// access and only disappear when the whole table is replaced.
#[derive(Debug, Default)]
pub struct CounterTable {
    slots: Mutex<HashMap<LogicalKey, PositionSlot>>,
}

impl CounterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the position slot for `key`, creating it at zero
    pub async fn slot(&self, key: &LogicalKey) -> PositionSlot {
        let mut slots = self.slots.lock().await;

        if let Some(slot) = slots.get(key) {
            return slot.clone();
        }

        let slot = Arc::new(Mutex::new(0));
        slots.insert(key.clone(), slot.clone());
        slot
    }

    /// Current position of `key` without creating an entry
    pub async fn position(&self, key: &LogicalKey) -> u64 {
        let slot = self.slots.lock().await.get(key).cloned();

        match slot {
            Some(slot) => *slot.lock().await,
            None => 0,
        }
    }

    /// Number of keys seen so far
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
