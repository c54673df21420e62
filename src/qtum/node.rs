use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::types::*;

/// Failure to obtain a usable reply from the node.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The node answered with a JSON-RPC error object.
    #[error("Qtum RPC error {}: {}", .0.code, .0.message)]
    Rpc(QtumRpcError),
    /// Non-success HTTP status without a JSON-RPC error body.
    #[error("Qtum RPC HTTP error: {status} - {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Connection, timeout or body transfer failure.
    #[error("Failed to reach Qtum RPC: {0}")]
    Transport(#[from] reqwest::Error),
    /// The reply could not be decoded into the expected shape.
    #[error("Failed to parse Qtum RPC response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Neither a result nor an error came back.
    #[error("No result in {0} response")]
    MissingResult(String),
}

/// One JSON-RPC round trip against the backing Qtum node.
///
/// `send` is the only required method; the lookups the transformers need are
/// built on top of it.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Perform `method` with positional `params` and return the raw reply.
    async fn send(&self, method: &str, params: Vec<Value>) -> Result<RawReply, NodeError>;

    /// Height of the current chain tip.
    async fn get_block_count(&self) -> Result<u64, NodeError> {
        let result = self
            .send(METHOD_GETBLOCKCOUNT, Vec::new())
            .await?
            .into_result(METHOD_GETBLOCKCOUNT)?;
        Ok(serde_json::from_value(result)?)
    }

    /// Height of the block with the given (unprefixed) hash.
    async fn get_block_height(&self, block_hash: &str) -> Result<u64, NodeError> {
        let result = self
            .send(METHOD_GETBLOCKHEADER, vec![Value::String(block_hash.to_string())])
            .await?
            .into_result(METHOD_GETBLOCKHEADER)?;
        let header: BlockHeader = serde_json::from_value(result)?;
        Ok(header.height)
    }

    /// Convert an unprefixed 20-byte hex address into a base58 Qtum address.
    async fn from_hex_address(&self, hex_address: &str) -> Result<String, NodeError> {
        let result = self
            .send(METHOD_FROMHEXADDRESS, vec![Value::String(hex_address.to_string())])
            .await?
            .into_result(METHOD_FROMHEXADDRESS)?;
        Ok(serde_json::from_value(result)?)
    }
}
