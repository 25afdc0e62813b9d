//! storage-agent - publishes usage of the host's watched filesystems

use anyhow::{Context, Result};
use clap::Parser;
use hermes_agents::bootstrap::{finish, init_logging, AgentArgs};
use hermes_agents::metrics::storage;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = AgentArgs::parse();
    init_logging(args.verbose);

    let ctx = args.bootstrap().await.context("Failed to start agent")?;
    let report = storage::run(&ctx.store, &ctx.config.storage, &ctx.host)
        .await
        .context("Storage agent aborted")?;

    Ok(finish("storage-agent", &report, false))
}
