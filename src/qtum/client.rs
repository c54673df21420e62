use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use super::node::{NodeClient, NodeError};
use super::types::*;

/// Client wrapper for the Qtum node's JSON-RPC API.
#[derive(Clone)]
pub struct QtumClient {
    http_client: Client,
    rpc_url: String,
    credentials: Option<(String, String)>,
}

impl QtumClient {
    /// Create a new Qtum RPC client.
    pub fn new(
        rpc_url: &str,
        credentials: Option<(String, String)>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for Qtum RPC")?;

        Ok(Self {
            http_client,
            rpc_url: rpc_url.to_string(),
            credentials,
        })
    }
}

#[async_trait]
impl NodeClient for QtumClient {
    async fn send(&self, method: &str, params: Vec<Value>) -> Result<RawReply, NodeError> {
        debug!("Sending Qtum RPC request: method={}, params={}", method, params.len());

        let request = QtumRpcRequest::new(method, &params);
        let mut builder = self.http_client.post(&self.rpc_url).json(&request);
        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, Some(password));
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        // qtumd reports RPC errors with a 500 status and a JSON body
        let reply = match serde_json::from_str::<RawReply>(&body) {
            Ok(reply) => reply,
            Err(_) if !status.is_success() => {
                error!("Qtum RPC returned HTTP {}: {}", status, body);
                return Err(NodeError::Http { status, body });
            }
            Err(e) => {
                error!("Qtum RPC {} returned an undecodable reply: {}: {}", method, e, body);
                return Err(NodeError::Decode(e));
            }
        };

        if let Some(err) = &reply.error {
            error!(
                "Qtum RPC error: method={}, code={}, message={}",
                method, err.code, err.message
            );
        } else if !status.is_success() {
            error!("Qtum RPC returned HTTP {}: {}", status, body);
            return Err(NodeError::Http { status, body });
        }

        Ok(reply)
    }
}
