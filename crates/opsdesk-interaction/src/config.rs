//! Configuration file management for opsdesk remote services.
//!
//! Supports reading endpoint settings and API keys from
//! `~/.config/opsdesk/secret.json`.

use opsdesk_core::error::{OpsdeskError, Result};
use opsdesk_infrastructure::OpsdeskPaths;
use serde::Deserialize;
use std::fs;

/// Root configuration structure for secret.json
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    /// Chat completion endpoint settings
    #[serde(default)]
    pub assistant: Option<EndpointConfig>,
    /// Operations endpoint family settings
    #[serde(default)]
    pub ops: Option<EndpointConfig>,
}

/// Settings for one remote service endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Loads the secret configuration file from ~/.config/opsdesk/secret.json
pub fn load_secret_config() -> Result<SecretConfig> {
    let config_path = OpsdeskPaths::secret_file()
        .map_err(|e| OpsdeskError::config(format!("Could not resolve secret file path: {}", e)))?;

    if !config_path.exists() {
        return Err(OpsdeskError::config(format!(
            "Configuration file not found at: {}",
            config_path.display()
        )));
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        OpsdeskError::config(format!(
            "Failed to read configuration file at {}: {}",
            config_path.display(),
            e
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        OpsdeskError::config(format!(
            "Failed to parse configuration file at {}: {}",
            config_path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: SecretConfig = serde_json::from_str(
            r#"{
                "assistant": {"base_url": "https://agent.example.com", "api_key": "k1"},
                "ops": {"base_url": "https://hooks.example.com"}
            }"#,
        )
        .unwrap();

        let assistant = config.assistant.unwrap();
        assert_eq!(assistant.base_url, "https://agent.example.com");
        assert_eq!(assistant.api_key.as_deref(), Some("k1"));
        assert!(config.ops.unwrap().api_key.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: SecretConfig = serde_json::from_str("{}").unwrap();
        assert!(config.assistant.is_none());
        assert!(config.ops.is_none());
    }
}
