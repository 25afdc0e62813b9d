//! Hermes store client
//!
//! Maps the seven store actions onto HTTP requests against the Hermes
//! key-value service:
//! - `action`: action names and validated commands
//! - `request`: endpoints, query parameters, raw responses
//! - `transport`: one HTTP call per request
//! - `client`: `StoreClient` and the `Store` operations used by agents
//! - `cli`: the `hermes-cli` runner

pub mod action;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod transport;

pub use action::{Action, Command, ITEM_SEPARATOR};
pub use client::{Store, StoreClient};
pub use config::StoreConfig;
pub use error::{ClientError, ConfigError, UsageError};
pub use request::{Endpoint, Method, StoreRequest, StoreResponse};
pub use transport::{HttpTransport, Transport};
