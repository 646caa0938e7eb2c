//! The chat orchestration pipeline.
//!
//! validate → embed → retrieve → assemble context → generate → respond.
//! Every stage runs once, strictly in that order; a failing stage ends the
//! request with its own [`ApiError`] kind and later stages never run.

use std::sync::Arc;

use crate::core::config::{AppConfig, ChatConfig};
use crate::core::errors::{ApiError, ProviderError};
use crate::llm::{ChatProvider, CompletionRequest, EmbeddingProvider, OpenAiProvider};
use crate::rag::{build_context, Source, SupabaseStore, VectorStore};

use super::prompt::build_messages;
use super::types::ChatResponse;

pub const NO_RESULTS_ANSWER: &str =
    "I couldn't find relevant information in the knowledge base. Please try rephrasing your question.";
pub const NO_ANSWER_FALLBACK: &str = "No answer generated.";

pub struct ChatPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn ChatProvider>,
    settings: ChatConfig,
}

impl ChatPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn ChatProvider>,
        settings: ChatConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            generator,
            settings,
        }
    }

    /// Wires the hosted OpenAI and Supabase clients. `Ok(None)` when any
    /// credential is missing.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, ProviderError> {
        let Some(openai) = OpenAiProvider::from_config(&config.openai)? else {
            return Ok(None);
        };
        let Some(store) = SupabaseStore::from_config(&config.vector_store)? else {
            return Ok(None);
        };

        let openai = Arc::new(openai);
        Ok(Some(Self::new(
            openai.clone(),
            Arc::new(store),
            openai,
            config.chat.clone(),
        )))
    }

    pub fn settings(&self) -> &ChatConfig {
        &self.settings
    }

    pub async fn answer(&self, message: Option<&str>) -> Result<ChatResponse, ApiError> {
        let query = validate_query(message)?;
        tracing::info!(query = %query, "Received chat query");

        let embedding = self.embed(query).await?;
        let sources = self.retrieve(&embedding).await?;

        if sources.is_empty() {
            tracing::info!("No relevant chunks found, returning fallback answer");
            return Ok(ChatResponse {
                answer: NO_RESULTS_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        let context = build_context(&sources);
        let answer = self.generate(query, &context, sources.len()).await?;

        Ok(ChatResponse { answer, sources })
    }

    async fn embed(&self, query: &str) -> Result<Vec<f32>, ApiError> {
        let embedding = self.embedder.embed(query).await.map_err(|e| {
            tracing::error!(provider = self.embedder.name(), "Embedding error: {}", e);
            ApiError::EmbeddingFailure
        })?;
        tracing::info!(dimensions = embedding.len(), "Embedding generated");
        Ok(embedding)
    }

    async fn retrieve(&self, embedding: &[f32]) -> Result<Vec<Source>, ApiError> {
        let sources = self
            .store
            .search(embedding, self.settings.match_count, &self.settings.filter)
            .await
            .map_err(|e| {
                tracing::error!("Search error: {}", e);
                ApiError::SearchFailure
            })?;
        tracing::info!(chunks = sources.len(), "Found chunks");
        Ok(sources)
    }

    async fn generate(
        &self,
        query: &str,
        context: &str,
        source_count: usize,
    ) -> Result<String, ApiError> {
        let messages = build_messages(
            self.settings.system_prompt.as_deref(),
            query,
            context,
            source_count,
        );
        let request = CompletionRequest::new(messages).with_temperature(self.settings.temperature);

        let text = self.generator.chat(request).await.map_err(|e| {
            tracing::error!(provider = self.generator.name(), "Chat error: {}", e);
            ApiError::GenerationFailure
        })?;

        let answer = match text {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                tracing::warn!("Model returned no text");
                NO_ANSWER_FALLBACK.to_string()
            }
        };
        tracing::info!(chars = answer.len(), "Answer generated");
        Ok(answer)
    }
}

/// Trimmed query, or [`ApiError::EmptyInput`] for missing or blank input.
pub fn validate_query(message: Option<&str>) -> Result<&str, ApiError> {
    match message.map(str::trim) {
        Some(query) if !query.is_empty() => Ok(query),
        _ => Err(ApiError::EmptyInput),
    }
}
