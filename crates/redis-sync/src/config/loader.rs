use std::path::Path;

use crate::config::schema::SyncConfig;
use crate::error::ConfigError;
use crate::json::to_pretty_string;
use crate::registry::TypeRegistry;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

/// A validated configuration together with the registry built from it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SyncConfig,
    pub registry: TypeRegistry,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LoadedConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: SyncConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    let registry = TypeRegistry::from_bindings(&config.value_types)?;
    log::debug!("Loaded {} value binding(s)", registry.len());

    Ok(LoadedConfig { config, registry })
}

/// Writes `config` as pretty-printed JSON.
pub fn save_config<P: AsRef<Path>>(path: P, config: &SyncConfig) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let content = to_pretty_string(config)?;
    std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::SchemaValidation {
            errors: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator =
        jsonschema::validator_for(&schema).map_err(|e| ConfigError::SchemaValidation {
            errors: format!("Failed to compile JSON schema: {}", e),
        })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &SyncConfig) -> Result<(), ConfigError> {
    if config.redis.address.trim().is_empty() {
        return Err(ConfigError::MissingValue {
            name: "redis.address".to_string(),
        });
    }

    Ok(())
}
