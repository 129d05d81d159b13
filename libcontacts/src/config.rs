//! Configuration management for the contact manager

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::types::SortOrder;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "Contact.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file; empty means `Contact.db` in the platform data directory
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sort order a new session starts with
    #[serde(default)]
    pub default_sort: SortOrder,

    /// How long the live query survives without a view subscriber
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
}

fn default_grace_period_ms() -> u64 {
    5000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_sort: SortOrder::default(),
            grace_period_ms: default_grace_period_ms(),
        }
    }
}

impl SessionConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file is not an error: built-in defaults are used instead.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default_config());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            database: DatabaseConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CONTACTS_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("contacts").join("config.toml"))
}

/// Resolve the data directory path following XDG Base Directory spec
pub fn resolve_data_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

    Ok(data_dir.join("contacts"))
}

/// Resolve the database path, expanding `~` when a path is given
pub fn resolve_db_path(configured: Option<&str>) -> Result<PathBuf> {
    match configured {
        Some(path) if !path.trim().is_empty() => {
            Ok(PathBuf::from(shellexpand::tilde(path).to_string()))
        }
        _ => Ok(resolve_data_path()?.join(DATABASE_FILE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
            [database]
            path = "/tmp/contacts/Contact.db"

            [session]
            default_sort = "last-name"
            grace_period_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, "/tmp/contacts/Contact.db");
        assert_eq!(config.session.default_sort, SortOrder::LastName);
        assert_eq!(config.session.grace_period(), Duration::from_millis(250));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_toml("").unwrap();
        assert!(config.database.path.is_empty());
        assert_eq!(config.session.default_sort, SortOrder::FirstName);
        assert_eq!(config.session.grace_period_ms, 5000);
    }

    #[test]
    fn test_unknown_sort_order_is_parse_error() {
        let result = Config::from_toml("[session]\ndefault_sort = \"age\"\n");
        assert!(matches!(
            result,
            Err(crate::ContactsError::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_resolve_db_path_expands_tilde() {
        let path = resolve_db_path(Some("~/contacts.db")).unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("contacts.db"));
    }

    #[test]
    fn test_resolve_db_path_blank_falls_back_to_data_dir() {
        let path = resolve_db_path(Some("  ")).unwrap();
        assert!(path.ends_with(Path::new("contacts").join(DATABASE_FILE)));
    }

    #[test]
    fn test_default_database_lives_in_platform_data_dir() {
        let config = Config::default_config();
        let path = resolve_db_path(Some(&config.database.path)).unwrap();

        let expected = dirs::data_dir().unwrap().join("contacts").join(DATABASE_FILE);
        assert_eq!(path, expected);
    }

    #[test]
    #[serial]
    fn test_load_honours_contacts_config_env() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[session]\ndefault_sort = \"phone-number\"\n").unwrap();

        std::env::set_var("CONTACTS_CONFIG", &config_path);
        let config = Config::load();
        std::env::remove_var("CONTACTS_CONFIG");

        assert_eq!(config.unwrap().session.default_sort, SortOrder::PhoneNumber);
    }

    #[test]
    #[serial]
    fn test_load_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::env::set_var("CONTACTS_CONFIG", temp_dir.path().join("absent.toml"));
        let config = Config::load();
        std::env::remove_var("CONTACTS_CONFIG");

        assert_eq!(config.unwrap().session.grace_period_ms, 5000);
    }
}
