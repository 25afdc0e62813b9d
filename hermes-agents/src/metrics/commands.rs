//! Command output agent
//!
//! Each configured key runs one command and stores its merged output as
//! timestamped lines (`I` for stdout, `E` for stderr). A command that exits
//! non-zero still has its output stored but marks the run as unclean; one
//! that cannot be started is skipped.

use crate::agent::{ensure_group, publish, RunReport};
use crate::config::{CommandConfig, CommandKey};
use crate::error::AgentError;
use crate::execution::CommandExecutor;
use hermes_client::Store;
use tracing::{info, warn};

/// Run one configured command; `None` when there is nothing to store
async fn collect(entry: &CommandKey) -> (Option<String>, bool) {
    let Some((program, args)) = entry.command.split_first() else {
        warn!("Key {} has an empty command", entry.key);
        return (None, false);
    };

    match CommandExecutor::run(program, args).await {
        Ok(result) => {
            if !result.success {
                warn!(
                    "{} for key {} exited with {:?}",
                    program, entry.key, result.exit_code
                );
            }
            (Some(result.render()), result.success)
        }
        Err(e) => {
            warn!("Failed to start {} for key {}: {}", program, entry.key, e);
            (None, false)
        }
    }
}

pub async fn run<S: Store>(store: &S, config: &CommandConfig) -> Result<RunReport, AgentError> {
    let created = ensure_group(store, &config.group).await?;

    let mut items = Vec::new();
    let mut failed_sources = 0;
    for entry in &config.keys {
        let (value, ok) = collect(entry).await;
        if !ok {
            failed_sources += 1;
        }
        if let Some(value) = value {
            items.push((entry.key.clone(), value));
        }
    }

    let tally = publish(store, &config.group, items).await;
    info!(
        "Processed {} commands into {}: {} written",
        config.keys.len(),
        config.group,
        tally.written
    );
    Ok(RunReport::new(created, tally, failed_sources))
}
