use async_trait::async_trait;

use super::LlmRequest;
use crate::domain::cache::ReturnValue;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Trait for completion providers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate completions for a request
    async fn generate(&self, request: &LlmRequest) -> Result<ReturnValue, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
