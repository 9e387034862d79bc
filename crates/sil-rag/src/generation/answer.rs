//! Answer generation through the configured generation provider

use std::sync::Arc;
use std::time::Instant;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::providers::GenerationProvider;

/// Sends prompts to the generation provider with a fixed model
pub struct AnswerGenerator {
    provider: Arc<dyn GenerationProvider>,
    model: String,
    stream: bool,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn GenerationProvider>, model: impl Into<String>, stream: bool) -> Self {
        Self {
            provider,
            model: model.into(),
            stream,
        }
    }

    pub fn from_config(provider: Arc<dyn GenerationProvider>, config: &LlmConfig) -> Self {
        Self::new(provider, config.generate_model.clone(), config.stream)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate raw answer text; provider failures propagate unchanged
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let answer = self
            .provider
            .complete(prompt, &self.model, self.stream)
            .await
            .inspect_err(|e| tracing::warn!("{} generation failed: {}", self.provider.name(), e))?;

        tracing::debug!(
            "Generated {} chars with {} in {}ms",
            answer.len(),
            self.model,
            start.elapsed().as_millis()
        );

        Ok(answer)
    }

    pub async fn health_check(&self) -> Result<bool> {
        self.provider.health_check().await
    }
}
