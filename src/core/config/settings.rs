use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::defaults;

/// Immutable service configuration, loaded once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub openai: OpenAiConfig,
    pub vector_store: VectorStoreConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the rolling `server.log`; stdout only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}

/// Embedding and chat-completion provider (OpenAI-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub embedding_model: String,
    pub embedding_dimensions: Option<usize>,
    pub chat_model: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::OPENAI_BASE_URL.to_string(),
            embedding_model: defaults::EMBEDDING_MODEL.to_string(),
            embedding_dimensions: None,
            chat_model: defaults::CHAT_MODEL.to_string(),
            timeout_secs: defaults::TIMEOUT_SECS,
        }
    }
}

/// Hosted vector store reached through a PostgREST RPC function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub url: Option<String>,
    pub service_key: Option<String>,
    pub match_function: String,
    pub timeout_secs: u64,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            match_function: defaults::MATCH_FUNCTION.to_string(),
            timeout_secs: defaults::TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub match_count: usize,
    pub temperature: f64,
    pub filter: Value,
    pub system_prompt: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            match_count: defaults::MATCH_COUNT,
            temperature: defaults::TEMPERATURE,
            filter: Value::Object(Map::new()),
            system_prompt: None,
        }
    }
}

impl AppConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Environment names of credentials the chat handler cannot run without.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.openai.api_key) {
            missing.push("OPENAI_API_KEY");
        }
        if is_blank(&self.vector_store.url) {
            missing.push("SUPABASE_URL");
        }
        if is_blank(&self.vector_store.service_key) {
            missing.push("SUPABASE_SERVICE_ROLE_KEY");
        }
        missing
    }
}

impl OpenAiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl VectorStoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}
