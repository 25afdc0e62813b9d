//! memory-agent - publishes total, free, used and cache memory

use anyhow::{Context, Result};
use clap::Parser;
use hermes_agents::bootstrap::{finish, init_logging, AgentArgs};
use hermes_agents::metrics::memory;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = AgentArgs::parse();
    init_logging(args.verbose);

    let ctx = args.bootstrap().await.context("Failed to start agent")?;
    let report = memory::run(&ctx.store, &ctx.config.memory, &ctx.host)
        .await
        .context("Memory agent aborted")?;

    Ok(finish("memory-agent", &report, false))
}
