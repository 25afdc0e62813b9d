//! Filesystem usage from `df`
//!
//! Each host watches a fixed set of mount points. A data row matches when its
//! last column equals a watched mount; columns 3 and 4 of that row are
//! stored as `<label>.total` and `<label>.used`.

use super::{fields, host_items, Metric};
use crate::agent::{ensure_group, publish, RunReport};
use crate::config::{MountPoint, StorageConfig};
use crate::discovery::HostIdentity;
use crate::error::AgentError;
use hermes_client::Store;

/// Parse a `df` table, skipping its header line
pub fn parse(table: &str, mounts: &[MountPoint]) -> Vec<Metric> {
    let mut metrics = Vec::new();
    for line in table.lines().skip(1) {
        let f = fields(line);
        let Some(last) = f.last() else {
            continue;
        };
        let Some(mount) = mounts.iter().find(|m| m.mount == *last) else {
            continue;
        };
        if f.len() < 4 {
            continue;
        }
        metrics.push(Metric::new(format!("{}.total", mount.label), f[2]));
        metrics.push(Metric::new(format!("{}.used", mount.label), f[3]));
    }
    metrics
}

/// Fails with `UnknownHost` before touching the store when the host has no
/// mount table.
pub async fn run<S: Store>(
    store: &S,
    config: &StorageConfig,
    host: &HostIdentity,
) -> Result<RunReport, AgentError> {
    let mounts = config.mounts_for(&host.hostname)?;
    let created = ensure_group(store, &config.group).await?;
    let table = config.source.read_or_warn().await;
    let failed_sources = usize::from(table.is_none());

    let metrics = parse(table.as_deref().unwrap_or_default(), mounts);
    let tally = publish(store, &config.group, host_items(host, metrics)).await;
    Ok(RunReport::new(created, tally, failed_sources))
}
