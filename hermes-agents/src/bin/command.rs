//! command-agent - stores the output of configured commands
//!
//! Exits 4 when a command could not run cleanly or a write failed.

use anyhow::{Context, Result};
use clap::Parser;
use hermes_agents::bootstrap::{finish, init_logging, AgentArgs};
use hermes_agents::metrics::commands;
use std::process::ExitCode;
use tracing::warn;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = AgentArgs::parse();
    init_logging(args.verbose);

    let ctx = args.bootstrap().await.context("Failed to start agent")?;
    if ctx.config.command.keys.is_empty() {
        warn!("No command keys configured");
    }
    let report = commands::run(&ctx.store, &ctx.config.command)
        .await
        .context("Command agent aborted")?;

    Ok(finish("command-agent", &report, true))
}
