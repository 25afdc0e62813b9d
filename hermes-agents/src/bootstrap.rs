//! Startup shared by the agent binaries
//!
//! Command line and environment are read here and nowhere else; everything
//! below receives an explicit `AgentConfig`.

use crate::agent::RunReport;
use crate::config::AgentConfig;
use crate::discovery::HostIdentity;
use crate::error::AgentError;
use crate::store::AgentStore;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Exit code when some source or write failed but the run completed
pub const PARTIAL_FAILURE: u8 = 4;

#[derive(Parser, Debug, Default)]
#[command(version)]
pub struct AgentArgs {
    /// Agent config file (default: <config dir>/hermes/agents.toml)
    #[arg(long, env = "HERMES_AGENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store base URL, overrides the config file
    #[arg(long, env = "HERMES_URL")]
    pub url: Option<Url>,

    /// Hostname used in keys, overrides config and system
    #[arg(long)]
    pub hostname: Option<String>,

    /// Reach the store through this client executable instead of HTTP
    #[arg(long)]
    pub client: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything an agent run needs
#[derive(Debug)]
pub struct AgentContext {
    pub config: AgentConfig,
    pub host: HostIdentity,
    pub store: AgentStore,
}

impl AgentArgs {
    /// Load the config file and apply command line overrides
    pub async fn load_config(&self) -> Result<AgentConfig, AgentError> {
        let mut config = AgentConfig::load(self.config.as_deref()).await?;
        if let Some(url) = &self.url {
            config.store.store.url = url.clone();
        }
        if let Some(client) = &self.client {
            config.store.client = Some(client.clone());
        }
        if let Some(hostname) = &self.hostname {
            config.hostname = Some(hostname.clone());
        }
        Ok(config)
    }

    pub async fn bootstrap(&self) -> Result<AgentContext, AgentError> {
        let config = self.load_config().await?;
        let host = HostIdentity::discover(config.hostname.as_deref());
        let store = AgentStore::from_settings(&config.store);
        Ok(AgentContext { config, host, store })
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Log the outcome. Host metric agents always succeed once the group
/// exists; `strict` agents report failed sources or writes with
/// `PARTIAL_FAILURE`.
pub fn finish(agent: &str, report: &RunReport, strict: bool) -> ExitCode {
    info!(
        "{} finished: {} written, {} failed writes, {} failed sources{}",
        agent,
        report.written,
        report.failed_writes,
        report.failed_sources,
        if report.group_created { ", group created" } else { "" }
    );
    ExitCode::from(exit_status(report, strict))
}

fn exit_status(report: &RunReport, strict: bool) -> u8 {
    if strict && !report.is_clean() {
        PARTIAL_FAILURE
    } else {
        0
    }
}
