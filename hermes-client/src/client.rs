//! Store client and the `Store` operations agents rely on

use crate::action::Command;
use crate::config::StoreConfig;
use crate::error::ClientError;
use crate::request::StoreResponse;
use crate::transport::{HttpTransport, Transport};
use std::future::Future;
use tracing::debug;

/// The three operations a metric agent performs against the store.
///
/// Responses are returned raw; callers decide what a non-success status means.
pub trait Store {
    fn list_groups(&self) -> impl Future<Output = Result<StoreResponse, ClientError>>;

    fn create_group(&self, group: &str) -> impl Future<Output = Result<StoreResponse, ClientError>>;

    fn set_item(
        &self,
        group: &str,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<StoreResponse, ClientError>>;
}

/// Stateless translator from commands to transport requests
#[derive(Debug, Clone)]
pub struct StoreClient<T = HttpTransport> {
    transport: T,
}

impl StoreClient<HttpTransport> {
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_transport(HttpTransport::new(config.url.clone()))
    }
}

impl<T: Transport> StoreClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Issue the single request mapped from `command`
    pub async fn execute(&self, command: &Command) -> Result<StoreResponse, ClientError> {
        let request = command.request();
        debug!("{} -> {}", command.action(), request);
        self.transport.send(&request).await
    }
}

impl<T: Transport> Store for StoreClient<T> {
    async fn list_groups(&self) -> Result<StoreResponse, ClientError> {
        self.execute(&Command::ListGroups).await
    }

    async fn create_group(&self, group: &str) -> Result<StoreResponse, ClientError> {
        self.execute(&Command::CreateGroup {
            group: group.to_string(),
        })
        .await
    }

    async fn set_item(&self, group: &str, key: &str, value: &str) -> Result<StoreResponse, ClientError> {
        self.execute(&Command::SetItem {
            group: group.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
        .await
    }
}
