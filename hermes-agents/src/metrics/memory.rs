//! Memory usage from `/proc/meminfo`
//!
//! Values keep the unit of the source (kB on Linux). Buffers, page cache and
//! slab are reported together as `cache`; `used` is what remains after free
//! memory and cache are taken off the total.

use super::{fields, host_items, Metric};
use crate::agent::{ensure_group, publish, RunReport};
use crate::config::MemoryConfig;
use crate::discovery::HostIdentity;
use crate::error::AgentError;
use hermes_client::Store;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemInfo {
    /// Raw tokens, stored as reported
    pub total: String,
    pub free: String,
    pub buffers: i64,
    pub cached: i64,
    pub slab: i64,
}

impl MemInfo {
    /// Scan for the labelled lines. Missing labels stay at zero.
    pub fn parse(text: &str) -> Self {
        let mut info = MemInfo {
            total: "0".to_string(),
            free: "0".to_string(),
            ..Default::default()
        };

        for line in text.lines() {
            let f = fields(line);
            let (label, value) = match f.as_slice() {
                [label, value, ..] => (*label, *value),
                _ => continue,
            };
            match label {
                "MemTotal:" => info.total = value.to_string(),
                "MemFree:" => info.free = value.to_string(),
                "Buffers:" => info.buffers = number(value),
                "Cached:" => info.cached = number(value),
                "Slab:" => info.slab = number(value),
                _ => {}
            }
        }
        info
    }

    pub fn cache(&self) -> i64 {
        self.buffers + self.cached + self.slab
    }

    pub fn used(&self) -> i64 {
        number(&self.total) - number(&self.free) - self.cache()
    }

    pub fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::new("total", self.total.clone()),
            Metric::new("free", self.free.clone()),
            Metric::new("used", self.used().to_string()),
            Metric::new("cache", self.cache().to_string()),
        ]
    }
}

fn number(token: &str) -> i64 {
    token.parse().unwrap_or(0)
}

pub async fn run<S: Store>(
    store: &S,
    config: &MemoryConfig,
    host: &HostIdentity,
) -> Result<RunReport, AgentError> {
    let created = ensure_group(store, &config.group).await?;
    let text = config.source.read_or_warn().await;
    let failed_sources = usize::from(text.is_none());
    let info = MemInfo::parse(text.as_deref().unwrap_or_default());
    debug!(
        "total={} free={} used={} cache={}",
        info.total,
        info.free,
        info.used(),
        info.cache()
    );

    let tally = publish(store, &config.group, host_items(host, info.metrics())).await;
    Ok(RunReport::new(created, tally, failed_sources))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "MemTotal:       16318480 kB
MemFree:         1042300 kB
MemAvailable:    9828940 kB
Buffers:          412560 kB
Cached:          7890012 kB
SwapCached:         1220 kB
Active:          8200000 kB
Slab:             734884 kB
SReclaimable:     601200 kB
";

    #[test]
    fn test_derived_values() {
        let info = MemInfo::parse("MemTotal: 1000\nMemFree: 200\nBuffers: 50\nCached: 30\nSlab: 20\n");
        assert_eq!(info.cache(), 100);
        assert_eq!(info.used(), 700);
    }

    #[test]
    fn test_real_layout() {
        let info = MemInfo::parse(MEMINFO);
        assert_eq!(info.total, "16318480");
        assert_eq!(info.free, "1042300");
        assert_eq!(info.cache(), 412560 + 7890012 + 734884);
        // SwapCached and SReclaimable must not be mistaken for Cached or Slab
        assert_eq!(info.cached, 7890012);
        assert_eq!(info.slab, 734884);
        assert_eq!(
            info.metrics(),
            vec![
                Metric::new("total", "16318480"),
                Metric::new("free", "1042300"),
                Metric::new("used", (16318480 - 1042300 - 9037456).to_string()),
                Metric::new("cache", "9037456"),
            ]
        );
    }

    #[test]
    fn test_missing_source_values_write_zero() {
        let info = MemInfo::parse("");
        assert_eq!(
            info.metrics(),
            vec![
                Metric::new("total", "0"),
                Metric::new("free", "0"),
                Metric::new("used", "0"),
                Metric::new("cache", "0"),
            ]
        );
    }

    #[test]
    fn test_malformed_lines_are_tolerated() {
        let info = MemInfo::parse("MemTotal:\nMemTotal: 500\nBuffers: lots\nFree: 9\n\n");
        assert_eq!(info.total, "500");
        assert_eq!(info.buffers, 0);
        assert_eq!(info.used(), 500);
    }

    #[test]
    fn test_used_can_go_negative() {
        let info = MemInfo::parse("MemTotal: 100\nMemFree: 90\nCached: 30\n");
        assert_eq!(info.used(), -20);
    }
}
