//! Configuration management for Homeserve

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

pub const CONFIG_ENV: &str = "HOMESERVE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Transport-level request timeout. The store itself never times out.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "~/.local/share/homeserve/state.json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        if config.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("api.base_url".to_string()).into());
        }
        Ok(config)
    }

    /// Like [`Config::load_from_path`], but a missing file yields the default
    /// configuration. A file that exists and fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default_config());
        }
        Self::load_from_path(path)
    }

    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:3000".to_string(),
                timeout_secs: Some(30),
            },
            storage: StorageConfig::default(),
        }
    }

    /// Storage path with `~` expanded
    pub fn resolve_state_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage.path).to_string())
    }
}

/// Resolve the configuration file path following the XDG layout
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("homeserve").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://api.homeserve.test"
timeout_secs = 10

[storage]
path = "/tmp/state.json"
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.api.base_url, "https://api.homeserve.test");
        assert_eq!(config.api.timeout_secs, Some(10));
        assert_eq!(config.resolve_state_path(), PathBuf::from("/tmp/state.json"));
    }

    #[test]
    fn test_storage_section_is_optional() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://x\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.storage, StorageConfig::default());
        assert_eq!(config.api.timeout_secs, None);
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"  \"\n").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&temp_dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default_config());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url=").unwrap();

        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    fn test_tilde_expansion() {
        let mut config = Config::default_config();
        config.storage.path = "~/homeserve/state.json".to_string();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.resolve_state_path(), home.join("homeserve/state.json"));
        }
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        std::env::set_var(CONFIG_ENV, "/etc/homeserve.toml");
        let path = resolve_config_path().unwrap();
        std::env::remove_var(CONFIG_ENV);

        assert_eq!(path, PathBuf::from("/etc/homeserve.toml"));
    }
}
