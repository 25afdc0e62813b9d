//! file-agent - stores the content of configured files
//!
//! Exits 4 when a file could not be read or a write failed.

use anyhow::{Context, Result};
use clap::Parser;
use hermes_agents::bootstrap::{finish, init_logging, AgentArgs};
use hermes_agents::metrics::files;
use std::process::ExitCode;
use tracing::warn;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = AgentArgs::parse();
    init_logging(args.verbose);

    let ctx = args.bootstrap().await.context("Failed to start agent")?;
    if ctx.config.file.keys.is_empty() {
        warn!("No file keys configured");
    }
    let report = files::run(&ctx.store, &ctx.config.file)
        .await
        .context("File agent aborted")?;

    Ok(finish("file-agent", &report, true))
}
