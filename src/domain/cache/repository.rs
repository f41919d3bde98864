//! Cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A single generated completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_info: Option<serde_json::Value>,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generation_info: None,
        }
    }

    pub fn with_info(mut self, info: serde_json::Value) -> Self {
        self.generation_info = Some(info);
        self
    }
}

/// Value stored per (prompt, llm_string) slot
pub type ReturnValue = Vec<Generation>;

/// Cache of LLM responses keyed by prompt and model configuration
///
/// `llm_string` identifies the model configuration; implementations treat it
/// as an opaque string and must keep it distinct from the prompt.
#[async_trait]
pub trait LlmCache: Send + Sync + Debug {
    /// Looks up the value stored for the pair
    async fn lookup(
        &self,
        prompt: &str,
        llm_string: &str,
    ) -> Result<Option<ReturnValue>, DomainError>;

    /// Stores a value for the pair, replacing any previous one
    async fn store(
        &self,
        prompt: &str,
        llm_string: &str,
        value: ReturnValue,
    ) -> Result<(), DomainError>;

    /// Removes every stored value
    async fn clear(&self) -> Result<(), DomainError>;
}
