//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths to all PageChat data files and directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Panel session state (`data/panel/`).
    pub panel: PathBuf,
    /// Model endpoint configuration (`data/model-config.json`).
    pub model_config_file: PathBuf,
    /// Coordinator configuration (`data/browser.json`).
    pub browser_config_file: PathBuf,
    /// Native credential vault (`data/credentials.json`).
    pub credentials_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            panel: root.join("panel"),
            model_config_file: root.join("model-config.json"),
            browser_config_file: root.join("browser.json"),
            credentials_file: root.join("credentials.json"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    /// Session file for the panel attached to `window`.
    pub fn panel_session_file(&self, window: &str) -> PathBuf {
        self.panel.join(format!("session-{}.json", window))
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(&self.panel)?;
        Ok(())
    }
}

/// Top-level PageChat configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageChatConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
}

impl PageChatConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3010);

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self { port, data_paths })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_layout() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path()).unwrap();
        assert!(paths.panel.is_dir());
        assert_eq!(paths.model_config_file, dir.path().join("model-config.json"));
        assert_eq!(
            paths.panel_session_file("7"),
            dir.path().join("panel").join("session-7.json")
        );
    }
}
