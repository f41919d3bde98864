//! Active cache handle and scoped installation
//!
//! [`ActiveCache`] is the explicit context callers consult to find the
//! cache serving LLM calls. Installing a cache returns a guard; dropping the
//! guard puts the previous cache back, including when the enclosed work
//! returns an error or unwinds.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::cache::ReplayCache;
use crate::domain::cache::LlmCache;

/// Shared handle to the cache currently in use
#[derive(Debug, Clone, Default)]
pub struct ActiveCache {
    current: Arc<RwLock<Option<Arc<dyn LlmCache>>>>,
}

impl ActiveCache {
    /// Creates a handle with no active cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle with `cache` already active
    pub fn with_cache(cache: Arc<dyn LlmCache>) -> Self {
        let active = Self::new();
        active.set(Some(cache));
        active
    }

    /// Returns the active cache, if any
    pub fn get(&self) -> Option<Arc<dyn LlmCache>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the active cache, returning the previous one
    pub fn set(&self, cache: Option<Arc<dyn LlmCache>>) -> Option<Arc<dyn LlmCache>> {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, cache)
    }

    /// Makes `cache` active until the returned guard is dropped
    #[must_use = "the previous cache is restored as soon as the guard is dropped"]
    pub fn install(&self, cache: Arc<dyn LlmCache>) -> CacheGuard {
        let previous = self.set(Some(cache));
        debug!(had_previous = previous.is_some(), "cache installed");

        CacheGuard {
            active: self.clone(),
            previous,
        }
    }

    /// Wraps `inner` in a fresh [`ReplayCache`] and makes it active
    #[must_use = "the previous cache is restored as soon as the scope is dropped"]
    pub fn replay(&self, inner: Arc<dyn LlmCache>) -> ReplayScope {
        let cache = Arc::new(ReplayCache::new(inner));
        let guard = self.install(cache.clone());

        ReplayScope {
            cache,
            _guard: guard,
        }
    }
}

/// Restores the previously active cache on drop
#[derive(Debug)]
pub struct CacheGuard {
    active: ActiveCache,
    previous: Option<Arc<dyn LlmCache>>,
}

impl Drop for CacheGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        debug!(restoring_previous = previous.is_some(), "cache uninstalled");
        self.active.set(previous);
    }
}

/// A replay cache that stays active for the lifetime of this value
#[derive(Debug)]
pub struct ReplayScope {
    cache: Arc<ReplayCache>,
    _guard: CacheGuard,
}

impl ReplayScope {
    /// The replay cache installed by this scope
    pub fn cache(&self) -> &Arc<ReplayCache> {
        &self.cache
    }
}

/// Runs `f` with a fresh replay cache over `inner` installed on `active`
///
/// The previously active cache is restored once `f` finishes, whatever its
/// outcome.
pub async fn with_replay_cache<F, Fut, T>(active: &ActiveCache, inner: Arc<dyn LlmCache>, f: F) -> T
where
    F: FnOnce(Arc<ReplayCache>) -> Fut,
    Fut: Future<Output = T>,
{
    let scope = active.replay(inner);
    f(scope.cache().clone()).await
}
