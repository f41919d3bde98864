use serde::{Deserialize, Serialize};

use crate::domain::cache::FingerprintParams;

/// A single prompt sent to a completion model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub prompt: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature: None,
            max_tokens: None,
            top_p: None,
            stop: None,
        }
    }

    pub fn builder() -> LlmRequestBuilder {
        LlmRequestBuilder::new()
    }

    /// Configuration string identifying how this prompt is answered
    ///
    /// Covers the provider, the model and every generation parameter that
    /// is set. The prompt itself is not part of it.
    pub fn llm_string(&self, provider: &str) -> String {
        let mut params = FingerprintParams::new(self.model.clone())
            .with_component("_provider", provider);

        if let Some(temp) = self.temperature {
            params = params.with_component("temperature", format!("{:.2}", temp));
        }

        if let Some(tokens) = self.max_tokens {
            params = params.with_component("max_tokens", tokens.to_string());
        }

        if let Some(top_p) = self.top_p {
            params = params.with_component("top_p", format!("{:.2}", top_p));
        }

        if let Some(stop) = &self.stop {
            let stop_json = serde_json::to_string(stop).unwrap_or_else(|_| "[]".to_string());
            params = params.with_component("stop", stop_json);
        }

        params.fingerprint()
    }
}

/// Builder for LlmRequest
#[derive(Debug, Default)]
pub struct LlmRequestBuilder {
    prompt: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    top_p: Option<f32>,
    stop: Option<Vec<String>>,
}

impl LlmRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn build(self) -> LlmRequest {
        LlmRequest {
            prompt: self.prompt,
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            stop: self.stop,
        }
    }
}
