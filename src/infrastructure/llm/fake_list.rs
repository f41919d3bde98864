use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::cache::{Generation, ReturnValue};
use crate::domain::{DomainError, LlmProvider, LlmRequest};

/// Scripted provider that answers with a fixed list of responses in order
///
/// Each call returns the next response, wrapping back to the first once the
/// list is exhausted. Useful for exercising caches without a real backend.
#[derive(Debug)]
pub struct FakeListLlm {
    responses: Vec<String>,
    served: Mutex<usize>,
}

impl FakeListLlm {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            served: Mutex::new(0),
        }
    }

    /// Total number of responses handed out
    pub fn calls(&self) -> usize {
        *self.served.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_response(&self) -> Option<String> {
        if self.responses.is_empty() {
            return None;
        }

        let mut served = self.served.lock().unwrap_or_else(|e| e.into_inner());
        let response = self.responses[*served % self.responses.len()].clone();
        *served += 1;

        Some(response)
    }
}

#[async_trait]
impl LlmProvider for FakeListLlm {
    async fn generate(&self, _request: &LlmRequest) -> Result<ReturnValue, DomainError> {
        let text = self.next_response().ok_or_else(|| {
            DomainError::provider(self.provider_name(), "No scripted responses configured")
        })?;

        Ok(vec![Generation::new(text)])
    }

    fn provider_name(&self) -> &'static str {
        "fake-list"
    }
}
