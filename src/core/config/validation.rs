use serde_json::{Map, Value};

use super::service::ConfigError;

/// Checks field types and ranges on the merged raw config before it is
/// deserialized, so a typo reports the offending path instead of a serde
/// error.
pub fn validate_config(config: &Value) -> Result<(), ConfigError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(server) = expect_optional_object(root, "server")? {
        validate_non_empty_string_field(server, "server.host", "host")?;
        validate_u64_field(server, "server.port", "port", 1, 65_535)?;
    }

    if let Some(logging) = expect_optional_object(root, "logging")? {
        validate_non_empty_string_field(logging, "logging.level", "level")?;
        validate_optional_string_field(logging, "logging.dir", "dir")?;
    }

    if let Some(openai) = expect_optional_object(root, "openai")? {
        validate_optional_string_field(openai, "openai.api_key", "api_key")?;
        validate_non_empty_string_field(openai, "openai.base_url", "base_url")?;
        validate_non_empty_string_field(openai, "openai.embedding_model", "embedding_model")?;
        validate_non_empty_string_field(openai, "openai.chat_model", "chat_model")?;
        validate_u64_field(
            openai,
            "openai.embedding_dimensions",
            "embedding_dimensions",
            1,
            8_192,
        )?;
        validate_u64_field(openai, "openai.timeout_secs", "timeout_secs", 1, 600)?;
    }

    if let Some(store) = expect_optional_object(root, "vector_store")? {
        validate_optional_string_field(store, "vector_store.url", "url")?;
        validate_optional_string_field(store, "vector_store.service_key", "service_key")?;
        validate_non_empty_string_field(store, "vector_store.match_function", "match_function")?;
        validate_u64_field(store, "vector_store.timeout_secs", "timeout_secs", 1, 600)?;
    }

    if let Some(chat) = expect_optional_object(root, "chat")? {
        validate_u64_field(chat, "chat.match_count", "match_count", 1, 100)?;
        validate_f64_field(chat, "chat.temperature", "temperature", 0.0, 2.0)?;
        expect_optional_object(chat, "filter").map_err(|_| config_type_error("chat.filter", "object"))?;
        validate_optional_string_field(chat, "chat.system_prompt", "system_prompt")?;
    }

    Ok(())
}

fn expect_optional_object<'a>(
    section: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    let Some(value) = present(section, key) else {
        return Ok(None);
    };
    value
        .as_object()
        .map(Some)
        .ok_or_else(|| config_type_error(key, "object"))
}

/// Treats an explicit `null` (`key: ~` in YAML) the same as an absent key.
fn present<'a>(section: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    section.get(key).filter(|value| !value.is_null())
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    let Some(value) = present(section, key) else {
        return Ok(());
    };
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(ConfigError::invalid(
            path,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn validate_f64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    let Some(value) = present(section, key) else {
        return Ok(());
    };
    let Some(number) = value.as_f64() else {
        return Err(config_type_error(path, "number"));
    };
    if number < min || number > max {
        return Err(ConfigError::invalid(
            path,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn validate_non_empty_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = present(section, key) else {
        return Ok(());
    };
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if text.trim().is_empty() {
        return Err(ConfigError::invalid(path, "value cannot be empty"));
    }
    Ok(())
}

fn validate_optional_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = present(section, key) else {
        return Ok(());
    };
    if value.as_str().is_none() {
        return Err(config_type_error(path, "string"));
    }
    Ok(())
}

fn config_type_error(path: &str, expected: &str) -> ConfigError {
    ConfigError::invalid(path, format!("expected {}", expected))
}
