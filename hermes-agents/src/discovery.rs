//! Host identification for Hermes agents
//!
//! Every key an agent writes is prefixed with the hostname, so the identity
//! is resolved once at startup: from the configured override when present,
//! otherwise from the system.

use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub hostname: String,
}

impl HostIdentity {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }

    /// Use `override_name` if given, else the system hostname
    pub fn discover(override_name: Option<&str>) -> Self {
        let identity = match override_name {
            Some(name) => {
                debug!("Using configured hostname {}", name);
                Self::new(name)
            }
            None => Self::new(gethostname::gethostname().to_string_lossy()),
        };
        info!("Running as {}", identity.hostname);
        identity
    }

    /// Item key for a metric: `<hostname>.<suffix>`
    pub fn key(&self, suffix: &str) -> String {
        format!("{}.{}", self.hostname, suffix)
    }
}
