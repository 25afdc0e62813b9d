//! Store backends available to agents
//!
//! - `StoreClient` talks HTTP in-process
//! - `ExecutableStore` runs the `hermes-cli` executable once per operation and
//!   reads its two-line output, the way scheduled agents were first deployed
//! - `AgentStore` picks one of the two from configuration

use crate::config::StoreSettings;
use crate::execution::CommandExecutor;
use hermes_client::{ClientError, Command, Store, StoreClient, StoreResponse};
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Store reached through the client executable
#[derive(Debug, Clone)]
pub struct ExecutableStore {
    program: PathBuf,
    url: Option<Url>,
}

impl ExecutableStore {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            url: None,
        }
    }

    /// Pass `--url` so the executable targets the same store as the agent
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    fn argv(&self, command: &Command) -> Vec<String> {
        let mut argv = Vec::new();
        if let Some(url) = &self.url {
            argv.push("--url".to_string());
            argv.push(url.to_string());
        }
        argv.push("--".to_string());
        argv.extend(command.to_args());
        argv
    }

    pub async fn execute(&self, command: &Command) -> Result<StoreResponse, ClientError> {
        let program = self.program.to_string_lossy();
        let argv = self.argv(command);
        let result = CommandExecutor::run(&program, &argv).await?;

        if !result.success {
            return Err(ClientError::Subprocess {
                code: result.exit_code,
                output: result.stderr(),
            });
        }
        parse_output(&result.stdout())
    }
}

/// Split the client's output into the status line and the body
fn parse_output(stdout: &str) -> Result<StoreResponse, ClientError> {
    let (status_line, rest) = stdout.split_once('\n').unwrap_or((stdout, ""));
    let status = status_line
        .trim()
        .parse::<u16>()
        .map_err(|_| ClientError::MalformedOutput(stdout.to_string()))?;
    let body = rest.strip_suffix('\n').unwrap_or(rest);
    debug!("Client executable answered {}", status);
    Ok(StoreResponse::new(status, body))
}

impl Store for ExecutableStore {
    async fn list_groups(&self) -> Result<StoreResponse, ClientError> {
        self.execute(&Command::ListGroups).await
    }

    async fn create_group(&self, group: &str) -> Result<StoreResponse, ClientError> {
        self.execute(&Command::CreateGroup {
            group: group.to_string(),
        })
        .await
    }

    async fn set_item(&self, group: &str, key: &str, value: &str) -> Result<StoreResponse, ClientError> {
        self.execute(&Command::SetItem {
            group: group.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
        .await
    }
}

/// The backend an agent binary writes through
#[derive(Debug, Clone)]
pub enum AgentStore {
    Http(StoreClient),
    Executable(ExecutableStore),
}

impl AgentStore {
    pub fn from_settings(settings: &StoreSettings) -> Self {
        match &settings.client {
            Some(program) => {
                debug!("Using client executable {}", program.display());
                AgentStore::Executable(ExecutableStore::new(program).with_url(settings.store.url.clone()))
            }
            None => {
                debug!("Using store at {}", settings.store.url);
                AgentStore::Http(StoreClient::new(&settings.store))
            }
        }
    }
}

impl Store for AgentStore {
    async fn list_groups(&self) -> Result<StoreResponse, ClientError> {
        match self {
            AgentStore::Http(client) => client.list_groups().await,
            AgentStore::Executable(exe) => exe.list_groups().await,
        }
    }

    async fn create_group(&self, group: &str) -> Result<StoreResponse, ClientError> {
        match self {
            AgentStore::Http(client) => client.create_group(group).await,
            AgentStore::Executable(exe) => exe.create_group(group).await,
        }
    }

    async fn set_item(&self, group: &str, key: &str, value: &str) -> Result<StoreResponse, ClientError> {
        match self {
            AgentStore::Http(client) => client.set_item(group, key, value).await,
            AgentStore::Executable(exe) => exe.set_item(group, key, value).await,
        }
    }
}
