//! Per-method translation between Ethereum JSON-RPC and Qtum RPC.
//!
//! Each supported Ethereum method has one [`Transformer`]. A transformer runs
//! in two phases:
//!
//! ```text
//! params --prepare--> (TranslatedCall, State)
//!                            |
//!                            | node call
//!                            v
//!            RawReply + State --finish--> Ethereum result
//! ```
//!
//! The [`Manager`] owns the method-name mapping and sequences the phases.

pub mod block;
pub mod create_contract;
pub mod gas;
pub mod get_storage_at;
pub mod manager;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::BridgeResult;
use crate::qtum::{NodeClient, RawReply, TranslatedCall};

pub use create_contract::CreateContract;
pub use gas::GasDefaults;
pub use get_storage_at::GetStorageAt;
pub use manager::{Manager, PreparedCall, RequestContext};

/// Encode/decode contract for one Ethereum method.
#[async_trait]
pub trait Transformer: Send + Sync + 'static {
    /// Ethereum method name the transformer answers.
    const METHOD: &'static str;

    /// Typed form of the inbound `params`.
    type Params: DeserializeOwned + Send;
    /// What the request phase hands to the response phase.
    type State: Send + 'static;
    /// Ethereum-shaped result.
    type Response: Serialize;

    /// Validate `params` and translate them into a node call. `node` is only
    /// used for lookups the translation itself depends on.
    async fn prepare(
        &self,
        params: Self::Params,
        node: &dyn NodeClient,
    ) -> BridgeResult<(TranslatedCall, Self::State)>;

    /// Shape the node's reply into the Ethereum result.
    fn finish(&self, state: Self::State, reply: RawReply) -> BridgeResult<Self::Response>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::qtum::{NodeClient, NodeError, QtumRpcError, RawReply};

    /// In-memory node answering each method with a canned reply.
    #[derive(Default)]
    pub struct FakeNode {
        replies: HashMap<String, RawReply>,
        calls: Mutex<Vec<(String, Vec<Value>)>>,
    }

    impl FakeNode {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_result(mut self, method: &str, result: Value) -> Self {
            self.replies.insert(method.to_string(), RawReply::ok(result));
            self
        }

        pub fn with_error(mut self, method: &str, code: i64, message: &str) -> Self {
            self.replies.insert(
                method.to_string(),
                RawReply::err(QtumRpcError {
                    code,
                    message: message.to_string(),
                    data: None,
                }),
            );
            self
        }

        pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn called(&self, method: &str) -> bool {
            self.calls().iter().any(|(m, _)| m == method)
        }
    }

    #[async_trait]
    impl NodeClient for FakeNode {
        async fn send(&self, method: &str, params: Vec<Value>) -> Result<RawReply, NodeError> {
            self.calls.lock().unwrap().push((method.to_string(), params));
            Ok(self.replies.get(method).cloned().unwrap_or_else(|| {
                RawReply::err(QtumRpcError {
                    code: -32601,
                    message: "Method not found".to_string(),
                    data: None,
                })
            }))
        }
    }
}
