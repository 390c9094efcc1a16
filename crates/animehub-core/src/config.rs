use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::AnimeHubError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub edit_pin: String,
    pub storage_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub season_limit: usize,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl AppConfig {
    /// Load config from `path`, merged over the built-in defaults.
    ///
    /// A missing file yields the defaults; a partial file only overrides the
    /// keys it names.
    pub fn load_from(path: &Path) -> Result<Self, AnimeHubError> {
        let mut merged = parse_table(DEFAULT_CONFIG)?;
        if path.exists() {
            let user_str = std::fs::read_to_string(path)?;
            merge_tables(&mut merged, parse_table(&user_str)?);
        }
        toml::Value::Table(merged)
            .try_into()
            .map_err(|e| AnimeHubError::Config(e.to_string()))
    }

    pub fn defaults() -> Result<Self, AnimeHubError> {
        toml::from_str(DEFAULT_CONFIG).map_err(|e| AnimeHubError::Config(e.to_string()))
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), AnimeHubError> {
        Self::ensure_parent(path)?;
        let content =
            toml::to_string_pretty(self).map_err(|e| AnimeHubError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the database file holding the saved library.
    pub fn db_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("animehub.db"))
            .unwrap_or_else(|| PathBuf::from("animehub.db"))
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    /// Ensure the parent directory of `path` exists.
    pub fn ensure_parent(path: &Path) -> Result<(), AnimeHubError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "animehub")
    }
}

fn parse_table(raw: &str) -> Result<toml::Table, AnimeHubError> {
    toml::from_str(raw).map_err(|e| AnimeHubError::Config(e.to_string()))
}

/// Overlay `overlay` onto `base`, recursing into tables present in both.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(over) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, over);
                continue;
            }
            base.insert(key, toml::Value::Table(over));
        } else {
            base.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::defaults().unwrap();
        assert_eq!(config.general.edit_pin, "1234");
        assert_eq!(config.general.storage_key, "myAnimeHub_v1");
        assert_eq!(config.catalog.season_limit, 30);
        assert_eq!(
            config.catalog.base_url,
            animehub_api::jikan::client::DEFAULT_BASE_URL
        );
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::defaults().unwrap();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.general.edit_pin, config.general.edit_pin);
        assert_eq!(deserialized.catalog.timeout_secs, config.catalog.timeout_secs);
    }

    #[test]
    fn test_load_from_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = AppConfig::defaults().unwrap();
        config.general.edit_pin = "9876".into();
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.general.edit_pin, "9876");

        let missing = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(missing.general.edit_pin, "1234");
    }

    #[test]
    fn test_partial_user_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\nedit_pin = \"0000\"\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.general.edit_pin, "0000");
        assert_eq!(loaded.general.storage_key, "myAnimeHub_v1");
        assert_eq!(loaded.catalog.season_limit, 30);
        assert_eq!(loaded.logging.filter, "animehub=info");
    }

    #[test]
    fn test_save_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("animehub.toml");
        let mut config = AppConfig::defaults().unwrap();
        config.catalog.season_limit = 12;
        config.save_to(&path).unwrap();

        assert!(path.exists());
        assert_eq!(AppConfig::load_from(&path).unwrap().catalog.season_limit, 12);
    }

    #[test]
    fn test_invalid_user_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "general = 5").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(AnimeHubError::Config(_))
        ));
    }
}
