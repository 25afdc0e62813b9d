//! The run protocol shared by every agent
//!
//! 1. List groups and create the agent's group if it is absent
//! 2. Collect and parse one data source (agent specific)
//! 3. Write each value with `set-item`, without stopping on failures
//!
//! Only an unreachable store in step 1 can abort a run. Write outcomes are counted and logged but
//! never stop the remaining writes.

use crate::error::AgentError;
use hermes_client::Store;
use tracing::{debug, info, warn};

/// Outcome of one agent run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub group_created: bool,
    pub written: usize,
    pub failed_writes: usize,
    /// Sources that could not be read or ran unsuccessfully
    pub failed_sources: usize,
}

impl RunReport {
    pub(crate) fn new(group_created: bool, tally: WriteTally, failed_sources: usize) -> Self {
        Self {
            group_created,
            written: tally.written,
            failed_writes: tally.failed,
            failed_sources,
        }
    }

    /// True when every source was read and every write was accepted
    pub fn is_clean(&self) -> bool {
        self.failed_writes == 0 && self.failed_sources == 0
    }
}

/// Make sure `group` exists in the store.
///
/// A failed listing counts as "no groups" so creation is still attempted.
/// Only a transport or client failure on creation is an error; a store that
/// answers with a failure status is logged and the writes go ahead.
/// Returns whether the group was created.
pub async fn ensure_group<S: Store>(store: &S, group: &str) -> Result<bool, AgentError> {
    let existing = match store.list_groups().await {
        Ok(response) => response.group_names(),
        Err(e) => {
            warn!("Listing groups failed, assuming none exist: {}", e);
            Vec::new()
        }
    };

    if existing.iter().any(|name| *name == group) {
        debug!("Group {} already exists", group);
        return Ok(false);
    }

    let response = store
        .create_group(group)
        .await
        .map_err(|source| AgentError::GroupCreation {
            group: group.to_string(),
            source,
        })?;

    if !response.is_success() {
        warn!(
            "Store answered {} creating group {}, writing anyway: {}",
            response.status, group, response.body
        );
        return Ok(false);
    }

    info!("Created group {}", group);
    Ok(true)
}

/// Counts from a batch of writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteTally {
    pub written: usize,
    pub failed: usize,
}

/// Write every `(key, value)` pair into `group`, one `set-item` each.
///
/// A write counts as failed on a transport error or a non-success status.
pub async fn publish<S, I>(store: &S, group: &str, items: I) -> WriteTally
where
    S: Store,
    I: IntoIterator<Item = (String, String)>,
{
    let mut tally = WriteTally::default();
    for (key, value) in items {
        match store.set_item(group, &key, &value).await {
            Ok(response) if response.is_success() => {
                debug!("{}/{} = {}", group, key, value);
                tally.written += 1;
            }
            Ok(response) => {
                warn!("Store answered {} for {}/{}: {}", response.status, group, key, response.body);
                tally.failed += 1;
            }
            Err(e) => {
                warn!("Writing {}/{} failed: {}", group, key, e);
                tally.failed += 1;
            }
        }
    }
    tally
}
