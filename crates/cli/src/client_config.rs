//! Client configuration
//!
//! Stored at `{home}/config/client.toml`. Every key is optional; a missing
//! file is the same as an empty one.
//!
//! # Example client.toml
//!
//! ```toml
//! # CLI output format (text|json)
//! output = "text"
//!
//! # Directory for keystore files; empty means {home}/keystore
//! keystore-dir = ""
//!
//! # scrypt cost for newly created keystores
//! [kdf]
//! n = 262144
//! r = 8
//! p = 1
//! dklen = 32
//! ```

use anyhow::{Context, Result};
use ecsign_account::AccountConfig;
use ecsign_crypto::KdfConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default client configuration filename.
pub const CLIENT_CONFIG_FILENAME: &str = "client.toml";

/// Default keystore directory name within home
pub const DEFAULT_KEYSTORE_DIR: &str = "keystore";

/// How command results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Client configuration for CLI commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// CLI output format (text|json).
    #[serde(default)]
    pub output: OutputFormat,

    /// Directory for keystore files.
    ///
    /// If empty, uses the default: `{home}/keystore`
    #[serde(default)]
    pub keystore_dir: String,

    /// scrypt cost for newly created keystores.
    #[serde(default)]
    pub kdf: KdfConfig,
}

impl ClientConfig {
    /// Get the path to the client config file.
    pub fn config_path(home: &Path) -> PathBuf {
        home.join("config").join(CLIENT_CONFIG_FILENAME)
    }

    /// Load client configuration from file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load(home: &Path) -> Result<Self> {
        let config_path = Self::config_path(home);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read client config: {}", config_path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse client config: {}", config_path.display()))?;

        config
            .kdf
            .validate()
            .with_context(|| format!("Invalid [kdf] in {}", config_path.display()))?;

        Ok(config)
    }

    /// Save client configuration to file.
    pub fn save(&self, home: &Path) -> Result<()> {
        let config_path = Self::config_path(home);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize client config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write client config: {}", config_path.display()))?;

        Ok(())
    }

    /// Resolve the effective keystore directory.
    ///
    /// Returns in order of precedence:
    /// 1. `keystore_dir` from config (if non-empty)
    /// 2. Default: `{home}/keystore`
    pub fn effective_keystore_dir(&self, home: &Path) -> PathBuf {
        if self.keystore_dir.is_empty() {
            home.join(DEFAULT_KEYSTORE_DIR)
        } else {
            PathBuf::from(&self.keystore_dir)
        }
    }

    /// Settings handed to the account service
    pub fn account_config(&self) -> AccountConfig {
        AccountConfig::new(self.kdf)
    }
}
