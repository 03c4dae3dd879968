//! Coordinator configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// URL prefixes of pages no script may be injected into.
pub const DEFAULT_RESTRICTED_PREFIXES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "moz-extension://",
    "safari-web-extension://",
    "edge://",
    "about:",
];

/// Browser-side configuration, read from browser.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_restricted")]
    pub restricted_prefixes: Vec<String>,
    /// Delay between DOM ready and the page script's automatic push.
    #[serde(default = "default_push_delay")]
    pub auto_push_delay_ms: u64,
}

fn default_restricted() -> Vec<String> {
    DEFAULT_RESTRICTED_PREFIXES
        .iter()
        .map(|p| p.to_string())
        .collect()
}
fn default_push_delay() -> u64 {
    1000
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            restricted_prefixes: default_restricted(),
            auto_push_delay_ms: default_push_delay(),
        }
    }
}

impl BrowserConfig {
    /// Load config from a JSON file, or return defaults.
    pub fn load(config_path: &Path) -> Self {
        std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Whether `url` is a browser-internal or extension page.
    pub fn is_restricted(&self, url: &str) -> bool {
        self.restricted_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }
}
