use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::provider::{ChatProvider, EmbeddingProvider};
use super::types::CompletionRequest;
use crate::core::config::OpenAiConfig;
use crate::core::errors::ProviderError;

/// OpenAI-compatible `/embeddings` and `/chat/completions` client.
#[derive(Clone)]
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    embedding_model: String,
    embedding_dimensions: Option<usize>,
    chat_model: String,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, client: Client) -> Self {
        let defaults = OpenAiConfig::default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            embedding_model: defaults.embedding_model,
            embedding_dimensions: None,
            chat_model: defaults.chat_model,
            client,
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &OpenAiConfig) -> Result<Option<Self>, ProviderError> {
        let Some(api_key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };
        let client = Client::builder().timeout(config.timeout()).build()?;
        let mut provider = Self::new(&config.base_url, api_key, client)
            .with_embedding_model(&config.embedding_model)
            .with_chat_model(&config.chat_model);
        provider.embedding_dimensions = config.embedding_dimensions;
        Ok(Some(provider))
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Requests truncated vectors and rejects responses of any other length.
    pub fn with_embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.embedding_dimensions = Some(dimensions);
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    async fn post(
        &self,
        service: &'static str,
        path: &str,
        body: &Value,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/{}", self.base_url, path);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                service,
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(res)
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>, ProviderError> {
        const SERVICE: &str = "embeddings";

        let mut body = json!({
            "model": self.embedding_model,
            "input": input,
        });
        if let (Some(obj), Some(dims)) = (body.as_object_mut(), self.embedding_dimensions) {
            obj.insert("dimensions".to_string(), json!(dims));
        }

        let res = self.post(SERVICE, "embeddings", &body).await?;
        let payload: EmbeddingResponse = res
            .json()
            .await
            .map_err(|e| ProviderError::decode(SERVICE, e.to_string()))?;

        let embedding = payload
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or_else(|| ProviderError::decode(SERVICE, "no embedding in response"))?;

        if embedding.is_empty() {
            return Err(ProviderError::decode(SERVICE, "empty embedding vector"));
        }
        if let Some(expected) = self.embedding_dimensions {
            if embedding.len() != expected {
                return Err(ProviderError::decode(
                    SERVICE,
                    format!("expected {} dimensions, got {}", expected, embedding.len()),
                ));
            }
        }

        Ok(embedding)
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: CompletionRequest) -> Result<Option<String>, ProviderError> {
        const SERVICE: &str = "chat completions";

        let mut body = json!({
            "model": self.chat_model,
            "messages": request.messages,
        });
        if let (Some(obj), Some(t)) = (body.as_object_mut(), request.temperature) {
            obj.insert("temperature".to_string(), json!(t));
        }

        let res = self.post(SERVICE, "chat/completions", &body).await?;
        let payload: ChatCompletionResponse = res
            .json()
            .await
            .map_err(|e| ProviderError::decode(SERVICE, e.to_string()))?;

        Ok(payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content))
    }
}
