//! Cache key types and generation strategies

use std::collections::BTreeMap;
use std::fmt::{self, Debug};

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Token placed between a configuration fingerprint and a sequence position.
///
/// Contains no digits, so the position always follows the last occurrence.
pub const REPLAY_MARKER: &str = "_replay_";

/// The (prompt, configuration) identity a caller reasons about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalKey {
    prompt: String,
    llm_string: String,
}

impl LogicalKey {
    pub fn new(prompt: impl Into<String>, llm_string: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            llm_string: llm_string.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn llm_string(&self) -> &str {
        &self.llm_string
    }

    /// Derives the physical slot for the given sequence position
    pub fn at(&self, position: u64) -> PhysicalKey<'_> {
        PhysicalKey {
            prompt: &self.prompt,
            llm_string: format!("{}{}{}", self.llm_string, REPLAY_MARKER, position),
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.prompt, self.llm_string)
    }
}

/// Position-qualified identity handed to the wrapped cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalKey<'a> {
    prompt: &'a str,
    llm_string: String,
}

impl PhysicalKey<'_> {
    pub fn prompt(&self) -> &str {
        self.prompt
    }

    pub fn llm_string(&self) -> &str {
        &self.llm_string
    }
}

/// Parameters describing a model configuration
///
/// Components live in a `BTreeMap`, so insertion order never changes the
/// resulting fingerprint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FingerprintParams {
    /// Model identifier
    pub model: String,
    /// Generation parameters (sorted by name)
    pub components: BTreeMap<String, String>,
}

impl FingerprintParams {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            components: BTreeMap::new(),
        }
    }

    /// Adds a component to the parameters
    pub fn with_component(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.components.insert(key.into(), value.into());
        self
    }

    /// Canonical configuration string used as the `llm_string` of a lookup
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.model.clone())
    }
}

/// Trait for turning a (prompt, llm_string) pair into a flat storage key
pub trait CacheKeyGenerator: Send + Sync + Debug {
    fn generate(&self, prompt: &str, llm_string: &str) -> String;

    /// Generates a key with a namespace prefix
    fn generate_with_namespace(&self, namespace: &str, prompt: &str, llm_string: &str) -> String {
        format!("{}:{}", namespace, self.generate(prompt, llm_string))
    }
}

/// SHA-256 over the length-prefixed prompt and configuration
#[derive(Debug, Clone, Default)]
pub struct DigestKeyGenerator;

impl DigestKeyGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CacheKeyGenerator for DigestKeyGenerator {
    fn generate(&self, prompt: &str, llm_string: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update((prompt.len() as u64).to_be_bytes());
        hasher.update(prompt.as_bytes());
        hasher.update((llm_string.len() as u64).to_be_bytes());
        hasher.update(llm_string.as_bytes());
        hex::encode(hasher.finalize())
    }
}
