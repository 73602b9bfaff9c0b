//! Configuration file handling.
//!
//! The configuration file is stored at `$FINANCE_HOME/config.json` and holds the settings of the
//! app. The SQLite database lives next to it at `$FINANCE_HOME/finance.sqlite`.

use crate::db::Db;
use crate::error::{ErrorType, IntoResult, Res};
use crate::store::Store;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_NAME: &str = "finance";
const CONFIG_VERSION: u8 = 1;
const CURRENCY_SYMBOL: &str = "₹";
const CONFIG_JSON: &str = "config.json";
const FINANCE_SQLITE: &str = "finance.sqlite";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FINANCE_HOME` and from there it loads `$FINANCE_HOME/config.json` and opens the
/// database.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
}

impl Config {
    /// Creates the data directory, writes an initial `config.json` with default settings and
    /// initializes the SQLite database at the current schema version.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/finance`
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or if a database already exists there.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        let (root, config_path, config_file) = create_home(&maybe_relative)
            .await
            .pub_result(ErrorType::Config)?;

        let db = Db::init(root.join(FINANCE_SQLITE))
            .await
            .context("Unable to create SQLite DB")
            .pub_result(ErrorType::StorageUnavailable)?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
        })
    }

    /// This will
    /// - validate that `finance_home` exists and that the config file exists
    /// - load the config file
    /// - open the database and bring its schema up to date
    pub async fn load(finance_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = finance_home.into();
        let (root, config_path, config_file) = load_home(&maybe_relative)
            .await
            .pub_result(ErrorType::Config)?;

        let db = Db::load(root.join(FINANCE_SQLITE))
            .await
            .context("Unable to load SQLite DB")
            .pub_result(ErrorType::StorageUnavailable)?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn sqlite_path(&self) -> &Path {
        self.db.path()
    }

    #[cfg(test)]
    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    /// The database as a shareable `Store` for the screens.
    pub fn store(&self) -> Arc<dyn Store> {
        Arc::new(self.db.clone())
    }

    /// The symbol printed in front of amounts, e.g. `₹`.
    pub fn currency_symbol(&self) -> &str {
        &self.config_file.currency_symbol
    }
}

async fn create_home(dir: &Path) -> Res<(PathBuf, PathBuf, ConfigFile)> {
    utils::make_dir(dir)
        .await
        .context("Unable to create the finance home directory")?;
    let root = utils::canonicalize(dir).await?;

    let config_path = root.join(CONFIG_JSON);
    if config_path.exists() {
        bail!("A config file already exists at '{}'", config_path.display());
    }
    let config_file = ConfigFile::default();
    config_file.save(&config_path).await?;
    Ok((root, config_path, config_file))
}

async fn load_home(dir: &Path) -> Res<(PathBuf, PathBuf, ConfigFile)> {
    let root = utils::canonicalize(dir)
        .await
        .context("Finance Home is missing")?;

    // Validate that the home directory is a directory.
    let _ = utils::read_dir(&root)
        .await
        .context("Finance Home is missing")?;

    let config_path = root.join(CONFIG_JSON);
    if !config_path.is_file() {
        bail!(
            "The config file is missing '{}', did you run 'finance init'?",
            config_path.display()
        )
    }
    let config_file = ConfigFile::load(&config_path).await?;
    Ok((root, config_path, config_file))
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "finance",
///   "config_version": 1,
///   "currency_symbol": "₹"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "finance"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Printed in front of amounts
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
}

fn default_currency_symbol() -> String {
    CURRENCY_SYMBOL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("finance_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.root().is_dir());
        assert!(config.config_path().is_file());
        assert!(config.sqlite_path().is_file());
        assert_eq!(config.currency_symbol(), "₹");
        assert_eq!(
            config.db().schema_version().await.unwrap(),
            Some(crate::db::CURRENT_VERSION)
        );
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        let err = Config::create(dir.path()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).await.unwrap();

        let loaded = Config::load(dir.path()).await.unwrap();

        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.sqlite_path(), loaded.sqlite_path());
        assert_eq!(created.currency_symbol(), loaded.currency_symbol());
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path().join("nope")).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[tokio::test]
    async fn test_config_load_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("finance init"));
    }

    #[tokio::test]
    async fn test_config_load_missing_database() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        let sqlite_path = config.sqlite_path().to_path_buf();
        drop(config);
        tokio::fs::remove_file(&sqlite_path).await.unwrap();

        let err = Config::load(dir.path()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::StorageUnavailable);
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.app_name, "finance");
        assert_eq!(config.config_version, 1);
        assert_eq!(config.currency_symbol, "₹");
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let original = ConfigFile {
            currency_symbol: "$".to_string(),
            ..ConfigFile::default()
        };

        original.save(&config_path).await.unwrap();
        let loaded = ConfigFile::load(&config_path).await.unwrap();

        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_file_load_without_currency_symbol() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "finance",
            "config_version": 1
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();

        assert_eq!(config.currency_symbol, "₹");
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "currency_symbol": "₹"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }
}
