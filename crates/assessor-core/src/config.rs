//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend URL, the last used email, and where the
//! access token is kept.
//!
//! Configuration is stored at `~/.config/assessor/config.json`, or under
//! `$ASSESSOR_HOME` when that is set.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::{FileTokenStore, KeyringTokenStore, TokenStore};

/// Application name used for config directory paths
const APP_NAME: &str = "assessor";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Overrides the config directory
pub const HOME_ENV: &str = "ASSESSOR_HOME";

/// Overrides the backend URL
pub const API_URL_ENV: &str = "ASSESSOR_API_URL";

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Where the access token is persisted between runs.
///
/// Defaults to a file in the config directory, which works everywhere.
/// The keychain is opt-in since headless Linux often has no usable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    Keyring,
    #[default]
    File,
}

impl FromStr for TokenStorage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keyring" => Ok(TokenStorage::Keyring),
            "file" => Ok(TokenStorage::File),
            other => Err(format!(
                "unknown token storage '{}' (expected 'keyring' or 'file')",
                other
            )),
        }
    }
}

impl fmt::Display for TokenStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStorage::Keyring => write!(f, "keyring"),
            TokenStorage::File => write!(f, "file"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
    pub token_storage: TokenStorage,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Directory holding the config file and, for file storage, the token
    pub fn home_dir() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join(CONFIG_FILE))
    }

    /// Backend URL: environment first, then config, then the local default
    pub fn base_url(&self) -> String {
        self.resolve_base_url(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_base_url(&self, from_env: Option<String>) -> String {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Open the configured token store
    pub fn token_store(&self) -> Result<Box<dyn TokenStore>> {
        Ok(self.token_store_in(&Self::home_dir()?))
    }

    /// Open the configured token store, keeping a token file under `home`
    pub fn token_store_in(&self, home: &Path) -> Box<dyn TokenStore> {
        match self.token_storage {
            TokenStorage::Keyring => Box::new(KeyringTokenStore::new()),
            TokenStorage::File => Box::new(FileTokenStore::in_dir(home)),
        }
    }
}
