//! Request transport
//!
//! `HttpTransport` sends each request as exactly one HTTP call: no retry,
//! no timeout, no authentication.

use crate::error::ClientError;
use crate::request::{StoreRequest, StoreResponse};
use std::future::Future;
use tracing::debug;
use url::Url;

/// Sends one store request and returns the raw response
pub trait Transport {
    fn send(&self, request: &StoreRequest) -> impl Future<Output = Result<StoreResponse, ClientError>>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &StoreRequest) -> Result<StoreResponse, ClientError> {
        let url = request.url(&self.base_url)?;
        debug!("{} {}", request.method, url);

        let mut builder = self.http.request(request.method.as_reqwest(), url);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("Store answered {} ({} bytes)", status, body.len());
        Ok(StoreResponse { status, body })
    }
}
