//! LLM invocation through the active cache

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::cache::ReturnValue;
use crate::domain::{ActiveCache, DomainError, LlmProvider, LlmRequest};

/// Calls a provider, consulting whatever cache is active on `active` first
///
/// A hit is returned without touching the provider. On a miss the provider
/// result is stored under the same (prompt, llm_string) before it is
/// returned, which is the lookup-then-store order the replay cache relies on.
#[derive(Clone)]
pub struct CachedLlmService {
    provider: Arc<dyn LlmProvider>,
    active: ActiveCache,
}

impl fmt::Debug for CachedLlmService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedLlmService")
            .field("provider", &self.provider.provider_name())
            .field("active", &self.active)
            .finish()
    }
}

impl CachedLlmService {
    pub fn new(provider: Arc<dyn LlmProvider>, active: ActiveCache) -> Self {
        Self { provider, active }
    }

    /// Handle used to install caches for this service
    pub fn active(&self) -> &ActiveCache {
        &self.active
    }

    #[instrument(skip_all, fields(provider = self.provider.provider_name(), model = %request.model))]
    pub async fn invoke(&self, request: &LlmRequest) -> Result<ReturnValue, DomainError> {
        let Some(cache) = self.active.get() else {
            debug!("no active cache, calling provider");
            return self.provider.generate(request).await;
        };

        let llm_string = request.llm_string(self.provider.provider_name());

        if let Some(cached) = cache.lookup(&request.prompt, &llm_string).await? {
            debug!("served from cache");
            return Ok(cached);
        }

        let generations = self.provider.generate(request).await?;
        cache
            .store(&request.prompt, &llm_string, generations.clone())
            .await?;
        debug!(generations = generations.len(), "provider result cached");

        Ok(generations)
    }

    /// Text of the first generation
    pub async fn invoke_text(&self, request: &LlmRequest) -> Result<String, DomainError> {
        self.invoke(request)
            .await?
            .into_iter()
            .next()
            .map(|generation| generation.text)
            .ok_or_else(|| {
                DomainError::provider(self.provider.provider_name(), "Empty generation list")
            })
    }
}
