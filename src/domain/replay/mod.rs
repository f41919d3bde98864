//! Replay domain - ordered replay of recorded cache values

mod cache;
mod counter;
mod history;
mod scope;

pub use cache::ReplayCache;
pub use counter::{CounterTable, PositionSlot};
pub use history::recorded_sequence;
pub use scope::{with_replay_cache, ActiveCache, CacheGuard, ReplayScope};
