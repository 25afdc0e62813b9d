//! Error types of the store client
//!
//! - `UsageError`: malformed invocation, detected before any I/O
//! - `ClientError`: the request could not be completed
//! - `ConfigError`: the configuration file could not be loaded

use crate::action::Action;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use thiserror::Error;

/// Renders the allowed action names, one per line.
fn valid_actions() -> String {
    Action::iter()
        .map(|action| action.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Not enough input parameter\nFormat: hermes-cli <action> <key> <value>\n\nValid actions:\n{}", valid_actions())]
    MissingAction,

    #[error("Invalid action detected: {0}\nPossible actions:\n{}", valid_actions())]
    InvalidAction(String),

    #[error("Key must be specified for {0} action but missing")]
    MissingTarget(Action),

    #[error("Group/Key must be defined but key is missing: <group>/<key>")]
    MissingSeparator,

    #[error("Value must be specified for {0} action but missing")]
    MissingValue(Action),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store URL cannot carry an endpoint path: {0}")]
    InvalidBaseUrl(url::Url),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("client exited with {code:?}: {output}")]
    Subprocess { code: Option<i32>, output: String },

    #[error("unexpected client output: {0:?}")]
    MalformedOutput(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find config directory")]
    NoConfigDir,

    #[error("config file does not exist: {0}")]
    Missing(PathBuf),

    #[error("config file cannot be read: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file is invalid: {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
