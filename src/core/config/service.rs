use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use super::defaults;
use super::settings::AppConfig;
use super::validation::validate_config;

const REDACT_PLACEHOLDER: &str = "****";

const SENSITIVE_PATTERNS: [&str; 10] = [
    "api_key",
    "secret",
    "password",
    "_token",
    "token_",
    "credential",
    "private_key",
    "service_key",
    "access_key",
    "bearer",
];

const SENSITIVE_WHITELIST: [&str; 3] = ["max_tokens", "total_tokens", "tokens"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid config at '{path}': {message}")]
    Invalid { path: String, message: String },
    #[error("Failed to build config: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(path: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Loads [`AppConfig`] from a public YAML file, an optional secrets YAML and
/// the process environment, in increasing order of precedence.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: PathBuf,
    secrets_path: PathBuf,
}

impl ConfigService {
    pub fn new(config_path: impl Into<PathBuf>, secrets_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            secrets_path: secrets_path.into(),
        }
    }

    /// Resolves file locations from `RAG_CHAT_CONFIG` / `RAG_CHAT_SECRETS`
    /// and loads a `.env` file into the environment if one is present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let config_path = env::var("RAG_CHAT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(defaults::CONFIG_FILE));
        let secrets_path = env::var("RAG_CHAT_SECRETS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(defaults::SECRETS_FILE));
        Self::new(config_path, secrets_path)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets_path(&self) -> &Path {
        &self.secrets_path
    }

    /// Merged raw file contents, before environment overrides.
    pub fn load_files(&self) -> Result<Value, ConfigError> {
        let public_config = load_yaml_file(&self.config_path)?;
        let secrets_config = load_yaml_file(&self.secrets_path)?;
        Ok(deep_merge(&public_config, &secrets_config))
    }

    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with<F>(&self, lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merged = self.load_files()?;
        apply_env_overrides(&mut merged, lookup);
        validate_config(&merged)?;
        Ok(serde_json::from_value(merged)?)
    }
}

fn load_yaml_file(path: &Path) -> Result<Value, ConfigError> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let value: Value = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(ConfigError::invalid("root", "expected object")),
    }
}

fn apply_env_overrides<F>(config: &mut Value, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (var, path) in defaults::ENV_OVERRIDES {
        let Some(raw) = lookup(var) else {
            continue;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let value = match var {
            // Left as a string when unparsable so validation names the field.
            "PORT" => raw
                .parse::<u16>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            _ => Value::String(raw.to_string()),
        };
        ensure_object_path(config, path, value);
    }
}

fn ensure_object_path(config: &mut Value, path: &[&str], value: Value) {
    if path.is_empty() {
        return;
    }

    let mut current = config;
    for (index, key) in path.iter().enumerate() {
        if index == path.len() - 1 {
            if let Some(map) = current.as_object_mut() {
                map.insert(key.to_string(), value);
            }
            return;
        }

        if !current.get(*key).map(|v| v.is_object()).unwrap_or(false) {
            let Some(map) = current.as_object_mut() else {
                return;
            };
            map.insert((*key).to_string(), Value::Object(Map::new()));
        }

        let Some(next) = current.get_mut(*key) else {
            return;
        };
        current = next;
    }
}

fn deep_merge(base: &Value, override_value: &Value) -> Value {
    match (base, override_value) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in override_map {
                let merged_value = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        _ => override_value.clone(),
    }
}

/// Copy of `value` with every secret-looking key masked, for logging.
pub fn redact_sensitive_values(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = Map::new();
            for (key, val) in map {
                if is_sensitive_key(key) && !val.is_null() {
                    redacted.insert(key.clone(), Value::String(REDACT_PLACEHOLDER.to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_values(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_values).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    if SENSITIVE_WHITELIST
        .iter()
        .any(|allowed| *allowed == key_lower)
    {
        return false;
    }
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| key_lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_files_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(dir.path().join("none.yml"), dir.path().join("none.yaml"));

        let cfg = service.load_with(no_env).unwrap();

        assert_eq!(cfg.server.port, 8787);
        assert_eq!(cfg.chat.match_count, 8);
        assert!(cfg.openai.api_key.is_none());
    }

    #[test]
    fn secrets_file_merges_over_public_file() {
        let dir = tempfile::tempdir().unwrap();
        let public = write(
            &dir,
            "config.yml",
            "openai:\n  chat_model: gpt-4o\n  api_key: placeholder\nchat:\n  match_count: 5\n",
        );
        let secrets = write(&dir, "secrets.yaml", "openai:\n  api_key: sk-secret\n");

        let cfg = ConfigService::new(public, secrets).load_with(no_env).unwrap();

        assert_eq!(cfg.openai.chat_model, "gpt-4o");
        assert_eq!(cfg.openai.api_key.as_deref(), Some("sk-secret"));
        assert_eq!(cfg.chat.match_count, 5);
    }

    #[test]
    fn environment_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        let public = write(&dir, "config.yml", "server:\n  port: 9000\n");
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "sk-env"),
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service-role"),
            ("PORT", "8100"),
            ("HOST", "   "),
        ]);

        let cfg = ConfigService::new(public, dir.path().join("secrets.yaml"))
            .load_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(cfg.server.port, 8100);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.openai.api_key.as_deref(), Some("sk-env"));
        assert!(cfg.missing_credentials().is_empty());
    }

    #[test]
    fn unparsable_port_is_reported_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(dir.path().join("a.yml"), dir.path().join("b.yaml"));

        let err = service
            .load_with(|key| (key == "PORT").then(|| "http".to_string()))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { ref path, .. } if path == "server.port"));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let public = write(&dir, "config.yml", "server: [unclosed\n");

        let err = ConfigService::new(public, dir.path().join("s.yaml"))
            .load_with(no_env)
            .unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn deep_merge_merges_objects_and_overrides_scalars() {
        let base = json!({ "a": 1, "b": { "c": 2, "d": 3 }, "arr": [1, 2] });
        let override_value = json!({ "b": { "c": 99 }, "arr": [3], "e": "x" });

        let merged = deep_merge(&base, &override_value);

        assert_eq!(
            merged,
            json!({ "a": 1, "b": { "c": 99, "d": 3 }, "arr": [3], "e": "x" })
        );
    }

    #[test]
    fn redact_sensitive_values_replaces_secrets_only() {
        let input = json!({
            "openai": { "api_key": "sk", "chat_model": "gpt-4o-mini", "max_tokens": 42 },
            "vector_store": { "service_key": "role", "url": "https://x" },
            "unset": { "api_key": null }
        });

        let redacted = redact_sensitive_values(&input);

        assert_eq!(
            redacted,
            json!({
                "openai": { "api_key": "****", "chat_model": "gpt-4o-mini", "max_tokens": 42 },
                "vector_store": { "service_key": "****", "url": "https://x" },
                "unset": { "api_key": null }
            })
        );
    }
}
