/*!
Test harness for agents

Combines a `MockStore` with a temporary directory holding synthetic OS data
(`/proc/meminfo`, `df`, `systemctl` output), plus assertions on the store
contents afterwards.
*/

use crate::store_stub::MockStore;
use anyhow::Result;
use hermes_client::{Endpoint, Method, StoreClient};
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

pub const SAMPLE_MEMINFO: &str = "MemTotal:        1000 kB
MemFree:          200 kB
MemAvailable:     650 kB
Buffers:           50 kB
Cached:            30 kB
SwapCached:         0 kB
Slab:              20 kB
";

pub const SAMPLE_DF: &str = "Filesystem     1K-blocks      Used Available Use% Mounted on
/dev/sda2      490617784 201532116 264085360  44% /
tmpfs            8159240         0   8159240   0% /dev/shm
/dev/sdb1      960302804 512003312 399445132  57% /mnt/work
";

pub const SAMPLE_FAILED_UNITS: &str = "  UNIT           LOAD   ACTIVE SUB    DESCRIPTION
● backup.service loaded failed failed Nightly backup

LOAD   = Reflects whether the unit definition was properly loaded.

1 loaded units listed.
";

pub struct TestHarness {
    pub store: MockStore,
    dir: TempDir,
    expectations: Vec<Expectation>,
}

#[derive(Debug)]
struct Expectation {
    group: String,
    expected_count: usize,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        env_logger::try_init().ok();

        Ok(Self {
            store: MockStore::new(),
            dir: TempDir::new()?,
            expectations: Vec::new(),
        })
    }

    /// Start with these groups already present in the store
    pub fn with_groups(mut self, groups: &[&str]) -> Self {
        for group in groups {
            self.store = self.store.with_group(group);
        }
        self
    }

    pub fn client(&self) -> StoreClient<MockStore> {
        self.store.client()
    }

    /// Write `content` to a file in the harness directory
    pub fn fixture(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content)?;
        log::debug!("Wrote fixture {}", path.display());
        Ok(path)
    }

    /// Command line that prints `content`, for command-backed sources
    pub fn fixture_command(&self, name: &str, content: &str) -> Result<Vec<String>> {
        let path = self.fixture(name, content)?;
        Ok(vec!["cat".to_string(), path.to_string_lossy().into_owned()])
    }

    /// Expect exactly `count` items in `group` when verifying
    pub fn expect_items(&mut self, group: &str, count: usize) -> &mut Self {
        self.expectations.push(Expectation {
            group: group.to_string(),
            expected_count: count,
        });
        self
    }

    pub fn verify_expectations(&self) -> Result<()> {
        for expectation in &self.expectations {
            let actual = self.store.items(&expectation.group).len();
            if actual != expectation.expected_count {
                anyhow::bail!(
                    "Expectation failed for group '{}': expected {} items, got {}",
                    expectation.group,
                    expectation.expected_count,
                    actual
                );
            }
        }
        Ok(())
    }

    pub fn assert_item(&self, group: &str, key: &str, expected: &str) -> Result<()> {
        match self.store.item(group, key) {
            Some(value) if value == expected => Ok(()),
            Some(value) => anyhow::bail!("{group}/{key}: expected {expected:?}, got {value:?}"),
            None => anyhow::bail!("{group}/{key} was never written"),
        }
    }

    /// No request of any kind reached the store
    pub fn assert_untouched(&self) -> Result<()> {
        let requests = self.store.requests();
        if !requests.is_empty() {
            anyhow::bail!("store received {} requests: {}", requests.len(), requests[0].request);
        }
        Ok(())
    }

    pub fn get_stats(&self) -> TestStats {
        let mut request_counts = HashMap::new();
        for recorded in self.store.requests() {
            let key = format!("{} /{}", recorded.request.method, recorded.request.endpoint);
            *request_counts.entry(key).or_insert(0) += 1;
        }

        TestStats {
            total_requests: request_counts.values().sum(),
            groups_created: self.store.count(Method::Post, Endpoint::Group),
            items_written: self.store.count(Method::Post, Endpoint::Item),
            request_counts,
        }
    }
}

#[derive(Debug)]
pub struct TestStats {
    pub total_requests: usize,
    pub groups_created: usize,
    pub items_written: usize,
    pub request_counts: HashMap<String, usize>,
}
