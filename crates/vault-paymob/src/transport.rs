//! # JSON Transport
//!
//! The one capability the gateway needs from the network: POST a JSON
//! body, get a parsed JSON body back or a typed failure. A retry or
//! backoff policy belongs in a `JsonTransport` wrapper, not at call sites.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use vault_core::{VaultError, VaultResult};

/// Perform a JSON POST and return the parsed response body.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    /// POST `body` to `url`.
    ///
    /// The response status is not interpreted; callers decide success from
    /// the body. Transport failures are `VaultError::Network`, unparseable
    /// bodies `VaultError::Serialization`.
    async fn post_json(&self, url: &str, body: &Value) -> VaultResult<Value>;
}

/// Type alias for a shared transport
pub type BoxedTransport = Arc<dyn JsonTransport>;

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpJsonTransport {
    client: Client,
}

impl HttpJsonTransport {
    /// Build a client, with an explicit timeout only when one is given.
    pub fn new(timeout: Option<Duration>) -> VaultResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| VaultError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonTransport for HttpJsonTransport {
    async fn post_json(&self, url: &str, body: &Value) -> VaultResult<Value> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| VaultError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| VaultError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("Non-success status from {}: {}", url, status);
        } else {
            debug!("POST {} -> {}", url, status);
        }

        serde_json::from_str(&text).map_err(|e| {
            VaultError::Serialization(format!("Invalid JSON response from {}: {}", url, e))
        })
    }
}
