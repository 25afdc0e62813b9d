//! Failed service count
//!
//! `systemctl --state=failed` ends with a summary such as
//! `3 loaded units listed.`; the leading number is the count.

use super::{fields, host_items, Metric};
use crate::agent::{ensure_group, publish, RunReport};
use crate::config::FailedUnitsConfig;
use crate::discovery::HostIdentity;
use crate::error::AgentError;
use hermes_client::Store;
use tracing::info;

pub const SUFFIX: &str = "failed-service-count";

/// One metric per summary line. No summary line, no metric.
pub fn parse(report: &str) -> Vec<Metric> {
    report
        .lines()
        .map(fields)
        .filter(|f| f.len() >= 3 && f[1] == "loaded" && f[2] == "units")
        .map(|f| Metric::new(SUFFIX, f[0]))
        .collect()
}

pub async fn run<S: Store>(
    store: &S,
    config: &FailedUnitsConfig,
    host: &HostIdentity,
) -> Result<RunReport, AgentError> {
    let created = ensure_group(store, &config.group).await?;
    let report = config.source.read_or_warn().await;
    let failed_sources = usize::from(report.is_none());

    let metrics = parse(report.as_deref().unwrap_or_default());
    if metrics.is_empty() {
        info!("No failed unit summary in {}", config.source);
    }

    let tally = publish(store, &config.group, host_items(host, metrics)).await;
    Ok(RunReport::new(created, tally, failed_sources))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "  UNIT             LOAD   ACTIVE SUB    DESCRIPTION
● backup.service   loaded failed failed Nightly backup
● mount-nas.mount  loaded failed failed NAS share

LOAD   = Reflects whether the unit definition was properly loaded.
ACTIVE = The high-level unit activation state, i.e. generalization of SUB.
SUB    = The low-level unit activation state, values depend on unit type.

2 loaded units listed.
";

    #[test]
    fn test_summary_line() {
        assert_eq!(parse("3 loaded units listed."), vec![Metric::new(SUFFIX, "3")]);
    }

    #[test]
    fn test_full_report() {
        assert_eq!(parse(REPORT), vec![Metric::new(SUFFIX, "2")]);
    }

    #[test]
    fn test_non_matching_lines_are_skipped() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n   \n").is_empty());
        assert!(parse("0 units listed.").is_empty());
        assert!(parse("3 loaded").is_empty());
        assert!(parse("3 units loaded listed.").is_empty());
    }
}
