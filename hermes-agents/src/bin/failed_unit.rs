//! failed-unit-agent - publishes the number of failed systemd units

use anyhow::{Context, Result};
use clap::Parser;
use hermes_agents::bootstrap::{finish, init_logging, AgentArgs};
use hermes_agents::metrics::failed_units;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = AgentArgs::parse();
    init_logging(args.verbose);

    let ctx = args.bootstrap().await.context("Failed to start agent")?;
    let report = failed_units::run(&ctx.store, &ctx.config.failed_units, &ctx.host)
        .await
        .context("Failed unit agent aborted")?;

    Ok(finish("failed-unit-agent", &report, false))
}
