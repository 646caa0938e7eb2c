pub mod defaults;
pub mod service;
pub mod settings;
pub mod validation;

pub use service::{redact_sensitive_values, ConfigError, ConfigService};
pub use settings::{
    AppConfig, ChatConfig, LoggingConfig, OpenAiConfig, ServerConfig, VectorStoreConfig,
};
