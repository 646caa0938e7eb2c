use async_trait::async_trait;

use super::types::CompletionRequest;
use crate::core::errors::ProviderError;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// provider name for logs (e.g. "openai")
    fn name(&self) -> &str;

    /// embed a single text into one vector
    async fn embed(&self, input: &str) -> Result<Vec<f32>, ProviderError>;
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &str;

    /// chat completion (non-streaming); `Ok(None)` when the model produced no text
    async fn chat(&self, request: CompletionRequest) -> Result<Option<String>, ProviderError>;
}
