// CLI configuration

use eyre::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings read from `config.yaml` in the platform config directory.
/// Everything has a default, so the file is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the task file; defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    /// Priority used by `add` when no flag is given.
    pub default_priority: String,
    /// Status used by `add` when no flag is given.
    pub default_status: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_priority: "medium".to_string(),
            default_status: "to-do".to_string(),
        }
    }
}

impl Config {
    /// Load from the default location; a missing file yields defaults,
    /// a malformed file is an error (a config the user wrote is not ignored).
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = ?path, "loaded config");
        Ok(config)
    }

    /// `<config dir>/taskeasy/config.yaml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskeasy").join("config.yaml"))
    }

    /// Resolved path of the task slot file
    pub fn data_file(&self) -> PathBuf {
        let dir = self
            .data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("taskeasy")))
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join("tasks.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_priority, "medium");
        assert_eq!(config.default_status, "to-do");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "data_dir: /tmp/tasks\ndefault_priority: high\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/tasks")));
        assert_eq!(config.default_priority, "high");
        // Unset field keeps its default
        assert_eq!(config.default_status, "to-do");
    }

    #[test]
    fn test_load_from_malformed_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "data_dir: [unclosed").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "default_prioritee: high\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_data_file_uses_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/var/tmp/te")),
            ..Config::default()
        };
        assert_eq!(config.data_file(), PathBuf::from("/var/tmp/te/tasks.json"));
    }
}
