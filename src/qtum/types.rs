use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::NodeError;

pub const METHOD_CREATECONTRACT: &str = "createcontract";
pub const METHOD_GETSTORAGE: &str = "getstorage";
pub const METHOD_GETBLOCKCOUNT: &str = "getblockcount";
pub const METHOD_GETBLOCKHEADER: &str = "getblockheader";
pub const METHOD_FROMHEXADDRESS: &str = "fromhexaddress";

/// JSON-RPC request to the Qtum node
#[derive(Debug, Serialize)]
pub struct QtumRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: &'a [Value],
}

impl<'a> QtumRpcRequest<'a> {
    pub fn new(method: &'a str, params: &'a [Value]) -> Self {
        Self {
            jsonrpc: "1.0",
            id: 1,
            method,
            params,
        }
    }
}

/// Raw reply from the Qtum node. Exactly one of `result` and `error` is
/// expected to be populated; a JSON `null` result counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReply {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<QtumRpcError>,
}

impl RawReply {
    pub fn ok(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn err(error: QtumRpcError) -> Self {
        Self {
            result: None,
            error: Some(error),
        }
    }

    /// Collapse the reply into its result, treating an empty reply as a
    /// protocol failure of `method`.
    pub fn into_result(self, method: &str) -> Result<Value, NodeError> {
        if let Some(err) = self.error {
            return Err(NodeError::Rpc(err));
        }
        self.result
            .ok_or_else(|| NodeError::MissingResult(method.to_string()))
    }
}

/// JSON-RPC error from the Qtum node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QtumRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A call in the node's dialect: native method name and positional params.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedCall {
    pub method: &'static str,
    pub params: Vec<Value>,
}

impl TranslatedCall {
    pub fn new(method: &'static str, params: Vec<Value>) -> Self {
        Self { method, params }
    }
}

/// Result of `createcontract`
#[derive(Debug, Deserialize)]
pub struct CreateContractResult {
    /// The transaction id
    pub txid: String,
    /// Qtum address of the sender
    #[serde(default)]
    pub sender: Option<String>,
    /// ripemd-160 hash of the sender
    #[serde(default)]
    pub hash160: Option<String>,
    /// Expected contract address
    #[serde(default)]
    pub address: Option<String>,
}

/// Result of `getstorage`.
///
/// Older nodes answer with a list of single-key maps, current ones with a map
/// keyed by the hashed slot whose values are again `{ slot: value }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StorageEntries {
    Sequence(Vec<BTreeMap<String, String>>),
    Keyed(BTreeMap<String, BTreeMap<String, String>>),
}

impl StorageEntries {
    /// Value stored under `slot`; the first matching entry wins.
    pub fn find(&self, slot: &str) -> Option<&str> {
        match self {
            StorageEntries::Sequence(entries) => entries
                .iter()
                .find_map(|entry| entry.get(slot))
                .map(String::as_str),
            StorageEntries::Keyed(entries) => entries
                .values()
                .find_map(|entry| entry.get(slot))
                .map(String::as_str),
        }
    }
}

/// Response from getblockheader (only the fields the bridge reads)
#[derive(Debug, Deserialize)]
pub struct BlockHeader {
    pub hash: String,
    pub height: u64,
}
