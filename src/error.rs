use jsonrpsee::types::ErrorObjectOwned;
use serde_json::{json, Value};
use thiserror::Error;

use crate::qtum::{NodeError, QtumRpcError};

/// JSON-RPC "method not found".
pub const METHOD_NOT_FOUND_CODE: i32 = -32601;
/// JSON-RPC "invalid params".
pub const INVALID_PARAMS_CODE: i32 = -32602;
/// JSON-RPC "internal error".
pub const INTERNAL_ERROR_CODE: i32 = -32603;
/// Server-defined "call failed", used for everything the node rejected.
pub const CALL_FAILED_CODE: i32 = -32000;

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors surfaced to Ethereum callers.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No transformer is registered for the method.
    #[error("method not supported: {0}")]
    MethodNotSupported(String),

    /// The caller's parameters were malformed or not allowed.
    #[error("{0}")]
    InvalidParams(String),

    /// The node reported a failure (or could not be reached).
    #[error("{message}")]
    Upstream {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// The node replied with something the bridge does not understand.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl BridgeError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        BridgeError::InvalidParams(message.into())
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        BridgeError::Protocol(message.into())
    }

    /// Numeric JSON-RPC code for this error class.
    pub fn code(&self) -> i32 {
        match self {
            BridgeError::MethodNotSupported(_) => METHOD_NOT_FOUND_CODE,
            BridgeError::InvalidParams(_) => INVALID_PARAMS_CODE,
            BridgeError::Upstream { .. } => CALL_FAILED_CODE,
            BridgeError::Protocol(_) => INTERNAL_ERROR_CODE,
        }
    }
}

impl From<QtumRpcError> for BridgeError {
    fn from(err: QtumRpcError) -> Self {
        BridgeError::Upstream {
            code: err.code,
            message: err.message,
            data: err.data,
        }
    }
}

impl From<NodeError> for BridgeError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::Rpc(rpc) => rpc.into(),
            NodeError::Decode(e) => {
                BridgeError::Protocol(format!("undecodable node response: {}", e))
            }
            NodeError::MissingResult(method) => {
                BridgeError::Protocol(format!("node returned no result for {}", method))
            }
            other => BridgeError::Upstream {
                code: i64::from(CALL_FAILED_CODE),
                message: other.to_string(),
                data: None,
            },
        }
    }
}

impl From<BridgeError> for ErrorObjectOwned {
    fn from(err: BridgeError) -> Self {
        let code = err.code();
        match err {
            BridgeError::Upstream {
                code: node_code,
                message,
                data,
            } => ErrorObjectOwned::owned(
                code,
                message,
                Some(json!({ "code": node_code, "data": data })),
            ),
            other => ErrorObjectOwned::owned(code, other.to_string(), None::<()>),
        }
    }
}
