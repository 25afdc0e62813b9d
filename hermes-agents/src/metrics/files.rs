//! File content agent
//!
//! Each configured key stores the full content of one file. Unreadable files
//! are skipped and mark the run as unclean; empty files are skipped quietly.

use crate::agent::{ensure_group, publish, RunReport};
use crate::config::FileConfig;
use crate::error::AgentError;
use hermes_client::Store;
use tracing::{debug, info, warn};

pub async fn run<S: Store>(store: &S, config: &FileConfig) -> Result<RunReport, AgentError> {
    let created = ensure_group(store, &config.group).await?;

    let mut items = Vec::new();
    let mut failed_sources = 0;
    for entry in &config.keys {
        match tokio::fs::read_to_string(&entry.path).await {
            Ok(content) if content.is_empty() => {
                debug!("{} is empty, skipping key {}", entry.path.display(), entry.key);
            }
            Ok(content) => items.push((entry.key.clone(), content)),
            Err(e) => {
                warn!("Failed to read {} for key {}: {}", entry.path.display(), entry.key, e);
                failed_sources += 1;
            }
        }
    }

    let tally = publish(store, &config.group, items).await;
    info!(
        "Processed {} files into {}: {} written",
        config.keys.len(),
        config.group,
        tally.written
    );
    Ok(RunReport::new(created, tally, failed_sources))
}
