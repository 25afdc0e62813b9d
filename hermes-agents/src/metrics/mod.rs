//! Metric agents
//!
//! Host metrics, written under `<hostname>.<suffix>` keys:
//! - `failed_units`: failed service count from the service manager
//! - `memory`: totals from the kernel memory report
//! - `storage`: filesystem usage for a host's watched mount points
//!
//! Configured values, written under their configured keys:
//! - `commands`: timestamped output of commands
//! - `files`: contents of files
//!
//! Parsers are pure functions over the source text; each module's `run`
//! drives the shared group/publish protocol from `crate::agent`.

pub mod commands;
pub mod failed_units;
pub mod files;
pub mod memory;
pub mod storage;

use crate::discovery::HostIdentity;

/// One derived value and the key suffix it is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub suffix: String,
    pub value: String,
}

impl Metric {
    pub fn new(suffix: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            value: value.into(),
        }
    }
}

/// Turn metrics into `(key, value)` pairs scoped to `host`
pub fn host_items(host: &HostIdentity, metrics: Vec<Metric>) -> Vec<(String, String)> {
    metrics
        .into_iter()
        .map(|metric| (host.key(&metric.suffix), metric.value))
        .collect()
}

/// Whitespace-separated fields of a line
pub(crate) fn fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}
