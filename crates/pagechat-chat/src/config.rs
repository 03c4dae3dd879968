//! Model endpoint configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Model configuration, read from model-config.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Most recent turns sent along with each request.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}
fn default_model() -> String {
    DEFAULT_MODEL.into()
}
fn default_max_tokens() -> usize {
    2000
}
fn default_temperature() -> f64 {
    0.7
}
fn default_history_window() -> usize {
    20
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            history_window: default_history_window(),
        }
    }
}

impl ModelConfig {
    /// Load config from file, then apply env overrides.
    pub fn load(config_path: &Path) -> Self {
        let mut config: ModelConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        if let Ok(endpoint) = std::env::var("PAGECHAT_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("PAGECHAT_MODEL") {
            config.model = model;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_endpoint_contract() {
        let config = ModelConfig::default();
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.model, "deepseek-chat");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model-config.json");
        std::fs::write(&path, r#"{"history_window": 4}"#).unwrap();

        let config = ModelConfig::load(&path);
        assert_eq!(config.history_window, 4);
        assert_eq!(config.max_tokens, 2000);
    }
}
