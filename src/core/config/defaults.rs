pub const HOST: &str = "127.0.0.1";
pub const PORT: u16 = 8787;
pub const LOG_LEVEL: &str = "info";

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const CHAT_MODEL: &str = "gpt-4o-mini";
pub const TIMEOUT_SECS: u64 = 60;

pub const MATCH_FUNCTION: &str = "match_documents";
pub const MATCH_COUNT: usize = 8;
pub const TEMPERATURE: f64 = 0.2;

pub const CONFIG_FILE: &str = "config.yml";
pub const SECRETS_FILE: &str = "secrets.yaml";

/// Environment variables layered over the YAML files, with their config path.
pub const ENV_OVERRIDES: [(&str, &[&str]); 8] = [
    ("OPENAI_API_KEY", &["openai", "api_key"]),
    ("OPENAI_BASE_URL", &["openai", "base_url"]),
    ("SUPABASE_URL", &["vector_store", "url"]),
    ("SUPABASE_SERVICE_ROLE_KEY", &["vector_store", "service_key"]),
    ("HOST", &["server", "host"]),
    ("PORT", &["server", "port"]),
    ("LOG_LEVEL", &["logging", "level"]),
    ("LOG_DIR", &["logging", "dir"]),
];
