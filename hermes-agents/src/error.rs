use hermes_client::{ClientError, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Running on invalid hostname: {0}")]
    UnknownHost(String),

    #[error("Error during {group} group creation: {source}")]
    GroupCreation {
        group: String,
        #[source]
        source: ClientError,
    },

    #[error("Failed to read {source_name}: {source}")]
    Source {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Group name {group:?} of the {agent} agent must not contain '/'")]
    InvalidGroup { agent: &'static str, group: String },

    #[error("Command {command} has no program")]
    EmptyCommand { command: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
