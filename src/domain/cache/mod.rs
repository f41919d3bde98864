//! Cache domain - LLM response cache contract and key derivation

mod key;
mod repository;

pub use key::{
    CacheKeyGenerator, DigestKeyGenerator, FingerprintParams, LogicalKey, PhysicalKey,
    REPLAY_MARKER,
};
pub use repository::{Generation, LlmCache, ReturnValue};

#[cfg(test)]
pub use repository::mock::{CacheCall, MockCache};
