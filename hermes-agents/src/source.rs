//! Where an agent reads its raw data from

use crate::error::AgentError;
use crate::execution::CommandExecutor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A command to run or a file to read.
///
/// In TOML: `source = { command = ["/usr/bin/df"] }` or
/// `source = { file = "/proc/meminfo" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Command(Vec<String>),
    File(PathBuf),
}

impl DataSource {
    pub fn command<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DataSource::Command(argv.into_iter().map(Into::into).collect())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        DataSource::File(path.into())
    }

    /// Read the whole text. A command's stdout is used even when it exits
    /// non-zero; the parsers decide what is usable.
    pub async fn read(&self) -> Result<String, AgentError> {
        match self {
            DataSource::Command(argv) => {
                let (program, args) = argv.split_first().ok_or_else(|| AgentError::EmptyCommand {
                    command: self.to_string(),
                })?;
                let result = CommandExecutor::run(program, args)
                    .await
                    .map_err(|source| AgentError::Source {
                        source_name: self.to_string(),
                        source,
                    })?;
                debug!("{} took {} ms", self, result.execution_time_ms);
                if !result.success {
                    warn!("{} exited with {:?}", self, result.exit_code);
                }
                Ok(result.stdout())
            }
            DataSource::File(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| AgentError::Source {
                        source_name: self.to_string(),
                        source,
                    })?;
                debug!("Read {} bytes from {}", text.len(), path.display());
                Ok(text)
            }
        }
    }
}

impl DataSource {
    /// `read`, with a failure logged and reported as `None` so the caller
    /// can carry on with empty input.
    pub async fn read_or_warn(&self) -> Option<String> {
        match self.read().await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Reading {} failed: {}", self, e);
                None
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Command(argv) => write!(f, "command `{}`", argv.join(" ")),
            DataSource::File(path) => write!(f, "file {}", path.display()),
        }
    }
}
