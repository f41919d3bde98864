//! LLM provider domain models and traits

mod provider;
mod request;

pub use provider::LlmProvider;
pub use request::{LlmRequest, LlmRequestBuilder};

#[cfg(test)]
pub use provider::MockLlmProvider;
