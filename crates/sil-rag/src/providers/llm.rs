//! Generation provider trait for producing answers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text completion against a hosted language model
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Complete `prompt` with `model`
    ///
    /// Failures (unreachable, timeout, non-success status) are returned as
    /// `Error::Generation` carrying the provider's diagnostic.
    async fn complete(&self, prompt: &str, model: &str, stream: bool) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
