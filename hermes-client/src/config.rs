//! Store location configuration
//!
//! Read from `cli.toml` in the Hermes config directory when present,
//! otherwise the built-in default store address is used.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

pub const DEFAULT_STORE_URL: &str = "http://atihome.lan:9100";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub url: Url,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_STORE_URL).expect("default store URL is valid"),
        }
    }
}

impl StoreConfig {
    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => read_toml(path).await,
            None => {
                let path = Self::config_file_path()?;
                if path.exists() {
                    read_toml(&path).await
                } else {
                    debug!("No {} found, using default store config", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get OS-specific config file path
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        config_dir().map(|dir| dir.join("cli.toml"))
    }
}

/// Hermes directory under the OS config directory
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    path.push("hermes");
    Ok(path)
}

/// Read and deserialize one TOML file
pub async fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing(path.to_path_buf()));
    }
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
