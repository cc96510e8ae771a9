//! Configuration file handling.
//!
//! The configuration file is stored at `$BUDGET_HOME/config.json` and holds
//! the settings for the budget CLI, most importantly the base URL of the
//! server that owns the authoritative ledger data.

use crate::store::SyncPolicy;
use crate::{utils, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "budget";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You
/// instantiate it by providing the path to `$BUDGET_HOME` and from there it
/// loads `$BUDGET_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and an initial `config.json` file using
    /// `server_url` along with default settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory,
    ///   e.g. `$HOME/budget`
    /// - `server_url` - The base URL of the budget server, e.g.
    ///   `http://localhost:4000`
    ///
    /// # Errors
    /// - Returns an error if the URL does not parse or any file operations
    ///   fail.
    pub async fn create(dir: impl Into<PathBuf>, server_url: &str) -> Result<Self> {
        // Reject a URL that could never be used before writing anything
        let _ = Url::parse(server_url)
            .with_context(|| format!("Invalid server URL '{server_url}'"))?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            server_url: server_url.to_string(),
            sync_policy: None,
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `budget_home` exists and that the config file exists
    /// - load the config file
    /// - return the loaded configuration object
    pub async fn load(budget_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = budget_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Budget home is missing, run 'budget init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            return Err(anyhow!(
                "The config file is missing '{}'",
                config_path.display()
            )
            .into());
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn server_url(&self) -> &str {
        &self.config_file.server_url
    }

    /// The policy for failed remote creates. Absent from the config file this
    /// is `SyncPolicy::Keep`.
    pub fn sync_policy(&self) -> SyncPolicy {
        self.config_file.sync_policy.unwrap_or_default()
    }
}

/// Represents the serialization and deserialization format of the
/// configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget",
///   "config_version": 1,
///   "server_url": "http://localhost:4000",
///   "sync_policy": "keep"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the budget server
    server_url: String,

    /// What to do with an optimistic local mutation when the remote create
    /// fails (optional, defaults to "keep")
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_policy: Option<SyncPolicy>,
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;
        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        if config.app_name != APP_NAME {
            return Err(anyhow!(
                "Invalid app_name in config file: expected '{}', got '{}'",
                APP_NAME,
                config.app_name
            )
            .into());
        }

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
            .map_err(Into::into)
    }
}
