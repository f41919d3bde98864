//! Domain layer - Core replay logic and contracts

pub mod cache;
pub mod error;
pub mod llm;
pub mod replay;

pub use cache::{
    CacheKeyGenerator, DigestKeyGenerator, FingerprintParams, Generation, LlmCache, LogicalKey,
    PhysicalKey, ReturnValue,
};
pub use error::DomainError;
pub use llm::{LlmProvider, LlmRequest, LlmRequestBuilder};
pub use replay::{
    recorded_sequence, with_replay_cache, ActiveCache, CacheGuard, CounterTable, ReplayCache,
    ReplayScope,
};
