//! Hermes agents - host telemetry published into the Hermes store
//!
//! Each agent binary runs once (typically from a scheduler):
//! - makes sure its group exists in the store
//! - reads one data source
//! - writes every derived value with `set-item`
//!
//! Modules:
//! - `config`: `agents.toml` and its defaults
//! - `discovery`: hostname used to scope keys
//! - `execution`: running local programs
//! - `source`: command or file data sources
//! - `store`: HTTP or client-executable store backends
//! - `agent`: group provisioning and publishing
//! - `metrics`: the individual agents
//! - `bootstrap`: shared binary startup

pub mod agent;
pub mod bootstrap;
pub mod config;
pub mod discovery;
pub mod error;
pub mod execution;
pub mod metrics;
pub mod source;
pub mod store;

pub use agent::{ensure_group, publish, RunReport};
pub use config::AgentConfig;
pub use discovery::HostIdentity;
pub use error::AgentError;
pub use source::DataSource;
pub use store::{AgentStore, ExecutableStore};
