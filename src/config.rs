//! Configuration management for the credential store
//!
//! Values are layered: built-in defaults, then an optional `config.toml`,
//! then `CREDSTORE_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::hashing::{DEFAULT_COST, MAX_COST, MIN_COST};

/// Default configuration file, looked up relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Prefix for environment overrides, e.g. `CREDSTORE_DATA_DIR`
pub const ENV_PREFIX: &str = "CREDSTORE";

/// Which document store backs the credential store
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One JSON file per collection under `data_dir`
    Json,
    /// Process memory only; nothing survives the run
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Document store backend
    /// Environment: CREDSTORE_BACKEND
    pub backend: StoreBackend,

    /// Directory holding collection files for the JSON backend
    /// Environment: CREDSTORE_DATA_DIR
    pub data_dir: String,

    /// Collection the user records live in
    /// Environment: CREDSTORE_COLLECTION
    pub collection: String,

    /// bcrypt work factor for newly hashed passwords
    /// Environment: CREDSTORE_HASH_COST
    pub hash_cost: u32,

    /// Custom login page; the bundled page is used when unset
    /// Environment: CREDSTORE_LOGIN_PAGE
    #[serde(default)]
    pub login_page: Option<String>,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file, which must then exist
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("backend", "json")?
            .set_default("data_dir", "./userdata")?
            .set_default("collection", "users")?
            .set_default("hash_cost", i64::from(DEFAULT_COST))?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.collection.is_empty() {
            return Err(config::ConfigError::Message(
                "collection cannot be empty".into(),
            ));
        }

        if self.backend == StoreBackend::Json && self.data_dir.is_empty() {
            return Err(config::ConfigError::Message(
                "data_dir cannot be empty for the json backend".into(),
            ));
        }

        if !(MIN_COST..=MAX_COST).contains(&self.hash_cost) {
            return Err(config::ConfigError::Message(format!(
                "hash_cost must be between {} and {}",
                MIN_COST, MAX_COST
            )));
        }

        Ok(())
    }

    /// Get data directory as PathBuf
    pub fn data_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Get the custom login page path, if one is configured
    pub fn login_page_path(&self) -> Option<PathBuf> {
        self.login_page.as_ref().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_file_values_override_defaults() {
        let tmp_dir = TempDir::new().unwrap();
        let path = write_config(
            &tmp_dir,
            r#"
backend = "memory"
collection = "accounts"
hash_cost = 6
login_page = "pages/login.html"
"#,
        );

        let config = AppConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.collection, "accounts");
        assert_eq!(config.hash_cost, 6);
        assert_eq!(config.data_dir, "./userdata");
        assert_eq!(
            config.login_page_path(),
            Some(PathBuf::from("pages/login.html"))
        );
    }

    #[test]
    fn test_defaults_apply_to_empty_file() {
        let tmp_dir = TempDir::new().unwrap();
        let path = write_config(&tmp_dir, "");

        let config = AppConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.backend, StoreBackend::Json);
        assert_eq!(config.collection, "users");
        assert_eq!(config.hash_cost, DEFAULT_COST);
        assert_eq!(config.data_dir_path(), PathBuf::from("./userdata"));
        assert!(config.login_page.is_none());
    }

    #[test]
    fn test_invalid_hash_cost_rejected() {
        let tmp_dir = TempDir::new().unwrap();
        let path = write_config(&tmp_dir, "hash_cost = 2\n");
        assert!(AppConfig::load_from(Some(&path)).is_err());
    }

    #[test]
    fn test_empty_collection_rejected() {
        let tmp_dir = TempDir::new().unwrap();
        let path = write_config(&tmp_dir, "collection = \"\"\n");
        assert!(AppConfig::load_from(Some(&path)).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("absent.toml");
        assert!(AppConfig::load_from(Some(&path)).is_err());
    }
}
