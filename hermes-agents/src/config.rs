//! Agent configuration
//!
//! Handles:
//! - Store location and access mode (in-process HTTP or client executable)
//! - Hostname override
//! - Per-agent group names and data sources
//! - Mount point tables for the storage agent

use crate::error::AgentError;
use crate::source::DataSource;
use hermes_client::config::{config_dir, read_toml};
use hermes_client::{StoreConfig, ITEM_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub store: StoreSettings,
    /// Overrides the system hostname in every key
    pub hostname: Option<String>,
    pub failed_units: FailedUnitsConfig,
    pub memory: MemoryConfig,
    pub storage: StorageConfig,
    pub command: CommandConfig,
    pub file: FileConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    #[serde(flatten)]
    pub store: StoreConfig,
    /// Client executable; when set agents talk to the store through it
    pub client: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FailedUnitsConfig {
    pub group: String,
    pub source: DataSource,
}

impl Default for FailedUnitsConfig {
    fn default() -> Self {
        Self {
            group: "system".to_string(),
            source: DataSource::command(["/usr/bin/systemctl", "--state=failed"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub group: String,
    pub source: DataSource,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            group: "memory".to_string(),
            source: DataSource::file("/proc/meminfo"),
        }
    }
}

/// One watched filesystem: `label` names the keys, `mount` matches the
/// last column of the usage report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountPoint {
    pub label: String,
    pub mount: String,
}

impl MountPoint {
    pub fn new(label: &str, mount: &str) -> Self {
        Self {
            label: label.to_string(),
            mount: mount.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub group: String,
    pub source: DataSource,
    /// Hostname -> watched mount points
    pub hosts: BTreeMap<String, Vec<MountPoint>>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let mut hosts = BTreeMap::new();
        hosts.insert(
            "atihome".to_string(),
            vec![
                MountPoint::new("root", "/"),
                MountPoint::new("work", "/mnt/work"),
                MountPoint::new("data", "/mnt/data"),
            ],
        );
        hosts.insert("pihome".to_string(), vec![MountPoint::new("root", "/")]);

        Self {
            group: "storage".to_string(),
            source: DataSource::command(["/usr/bin/df"]),
            hosts,
        }
    }
}

impl StorageConfig {
    pub fn mounts_for(&self, hostname: &str) -> Result<&[MountPoint], AgentError> {
        self.hosts
            .get(hostname)
            .map(Vec::as_slice)
            .ok_or_else(|| AgentError::UnknownHost(hostname.to_string()))
    }
}

/// A key whose value is the output of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandKey {
    pub key: String,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub group: String,
    pub keys: Vec<CommandKey>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            group: "command".to_string(),
            keys: Vec::new(),
        }
    }
}

/// A key whose value is the content of a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileKey {
    pub key: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub group: String,
    pub keys: Vec<FileKey>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            group: "file".to_string(),
            keys: Vec::new(),
        }
    }
}

impl AgentConfig {
    /// Load config from `path`, or from the OS-specific location.
    ///
    /// An explicit path must exist; without one, a missing file yields the
    /// built-in defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self, AgentError> {
        let config: Self = match path {
            Some(path) => read_toml(path).await?,
            None => {
                let path = Self::config_file_path()?;
                if path.exists() {
                    read_toml(&path).await?
                } else {
                    debug!("No {} found, using default agent config", path.display());
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Group names end up in `group/key` item paths, so they cannot hold the
    /// separator themselves.
    pub fn validate(&self) -> Result<(), AgentError> {
        let groups = [
            ("failed units", &self.failed_units.group),
            ("memory", &self.memory.group),
            ("storage", &self.storage.group),
            ("command", &self.command.group),
            ("file", &self.file.group),
        ];
        for (agent, group) in groups {
            if group.contains(ITEM_SEPARATOR) {
                return Err(AgentError::InvalidGroup {
                    agent,
                    group: group.clone(),
                });
            }
        }
        Ok(())
    }

    /// Get OS-specific config file path
    pub fn config_file_path() -> Result<PathBuf, AgentError> {
        Ok(config_dir()?.join("agents.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.store.store.url.as_str(), "http://atihome.lan:9100/");
        assert!(config.store.client.is_none());
        assert_eq!(config.failed_units.group, "system");
        assert_eq!(config.memory.group, "memory");
        assert_eq!(config.storage.group, "storage");
        assert_eq!(config.memory.source, DataSource::file("/proc/meminfo"));
    }

    #[test]
    fn test_default_mount_tables() {
        let storage = StorageConfig::default();
        let labels: Vec<&str> = storage
            .mounts_for("atihome")
            .unwrap()
            .iter()
            .map(|m| m.label.as_str())
            .collect();
        assert_eq!(labels, ["root", "work", "data"]);
        assert_eq!(storage.mounts_for("pihome").unwrap(), [MountPoint::new("root", "/")]);
        assert!(matches!(storage.mounts_for("laptop"), Err(AgentError::UnknownHost(h)) if h == "laptop"));
    }

    #[test]
    fn test_config_file_path() {
        if let Ok(path) = AgentConfig::config_file_path() {
            assert!(path.ends_with("hermes/agents.toml"));
        }
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
hostname = "testhost"

[store]
url = "http://127.0.0.1:9300"
client = "/usr/local/bin/hermes-cli"

[memory]
group = "mem"

[storage.hosts]
testhost = [{{ label = "root", mount = "/" }}, {{ label = "home", mount = "/home" }}]

[[command.keys]]
key = "uptime"
command = ["uptime", "-p"]

[[file.keys]]
key = "motd"
path = "/etc/motd"
"#
        )
        .unwrap();

        let config = AgentConfig::load(Some(file.path())).await.unwrap();
        assert_eq!(config.hostname.as_deref(), Some("testhost"));
        assert_eq!(config.store.store.url.port(), Some(9300));
        assert_eq!(config.store.client, Some(PathBuf::from("/usr/local/bin/hermes-cli")));
        assert_eq!(config.memory.group, "mem");
        // untouched sections keep their defaults
        assert_eq!(config.memory.source, DataSource::file("/proc/meminfo"));
        assert_eq!(config.failed_units.group, "system");
        assert_eq!(config.storage.mounts_for("testhost").unwrap().len(), 2);
        assert!(config.storage.mounts_for("atihome").is_err());
        assert_eq!(config.command.keys[0].command, ["uptime", "-p"]);
        assert_eq!(config.file.keys[0].path, PathBuf::from("/etc/motd"));
    }

    #[tokio::test]
    async fn test_group_with_separator_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[storage]\ngroup = \"disks/local\"\n").unwrap();

        let err = AgentConfig::load(Some(file.path())).await.unwrap_err();
        assert!(matches!(
            err,
            AgentError::InvalidGroup { agent: "storage", ref group } if group == "disks/local"
        ));
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[tokio::test]
    async fn test_missing_explicit_file() {
        let err = AgentConfig::load(Some(Path::new("/nonexistent/agents.toml")))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }
}
