use std::path::Path;
use crate::errors::VulnsnipError;
use super::types::VulnsnipConfig;
use super::security::validate_command_table;
use super::schema::CONFIG_SCHEMA;
use tracing::{info, warn};

pub async fn parse_config(path: &Path) -> Result<VulnsnipConfig, VulnsnipError> {
    if !path.exists() {
        return Err(VulnsnipError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| VulnsnipError::Config(format!("Cannot stat {}: {}", path.display(), e)))?;
    if metadata.len() > 1_048_576 {
        return Err(VulnsnipError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| VulnsnipError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    parse_config_str(&content)
}

/// Parse from an in-memory YAML document.
pub fn parse_config_str(content: &str) -> Result<VulnsnipConfig, VulnsnipError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| VulnsnipError::Config(format!("Invalid YAML: {}", e)))?;

    // An empty document means "all defaults"
    if yaml.is_null() {
        return Ok(VulnsnipConfig::default());
    }

    validate_schema(&yaml)?;

    let config: VulnsnipConfig = serde_yaml::from_value(yaml)
        .map_err(|e| VulnsnipError::Config(format!("Invalid configuration: {}", e)))?;

    validate_semantics(&config)?;

    Ok(config)
}

/// Load the config at `path`, or the defaults when no path was given.
pub async fn load_config(path: Option<&Path>) -> Result<VulnsnipConfig, VulnsnipError> {
    match path {
        Some(p) => {
            let config = parse_config(p).await?;
            info!(path = %p.display(), "Loaded configuration");
            Ok(config)
        }
        None => {
            let config = VulnsnipConfig::default();
            validate_semantics(&config)?;
            Ok(config)
        }
    }
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), VulnsnipError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| VulnsnipError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| VulnsnipError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| VulnsnipError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        let messages: Vec<String> = errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();
        // Advisory only; typed parsing and semantic checks are authoritative
        for msg in &messages {
            warn!(validation_error = %msg, "Config schema warning");
        }
    }

    Ok(())
}

fn validate_semantics(config: &VulnsnipConfig) -> Result<(), VulnsnipError> {
    if config.debug_commands.timeout_secs == 0 {
        return Err(VulnsnipError::Config(
            "debug_commands.timeout_secs must be at least 1".into(),
        ));
    }

    validate_command_table(&config.debug_commands.allowlist)?;

    if config.challenges.source_dirs.is_empty() {
        warn!("No snippet source directories configured; the challenge catalog will be empty");
    }

    if config.server.port == 0 {
        return Err(VulnsnipError::Config("server.port must be non-zero".into()));
    }

    Ok(())
}
