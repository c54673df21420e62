//! End-to-end tests of the two-phase pipeline against an in-memory node.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use qtum_eth_rpc::config::Config;
use qtum_eth_rpc::error::{BridgeError, CALL_FAILED_CODE, INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE};
use qtum_eth_rpc::qtum::{NodeClient, NodeError, QtumRpcError, RawReply};
use qtum_eth_rpc::server::build_manager;
use qtum_eth_rpc::transformer::{GasDefaults, Manager};

#[derive(Default)]
struct ScriptedNode {
    replies: HashMap<&'static str, RawReply>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl ScriptedNode {
    fn reply(mut self, method: &'static str, reply: RawReply) -> Self {
        self.replies.insert(method, reply);
        self
    }

    fn methods_called(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    fn params_of(&self, method: &str) -> Option<Vec<Value>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
    }
}

#[async_trait]
impl NodeClient for ScriptedNode {
    async fn send(&self, method: &str, params: Vec<Value>) -> Result<RawReply, NodeError> {
        self.calls.lock().unwrap().push((method.to_string(), params));
        Ok(self.replies.get(method).cloned().unwrap_or_default())
    }
}

fn test_config() -> Config {
    Config {
        qtum_rpc_url: "http://127.0.0.1:3889".to_string(),
        qtum_rpc_user: Some("qtum".to_string()),
        qtum_rpc_password: Some("testpasswd".to_string()),
        qtum_rpc_timeout: std::time::Duration::from_secs(5),
        bridge_rpc_port: 23889,
        gas_defaults: GasDefaults {
            gas_limit: 2_500_000,
            gas_price: 40,
        },
        log_level: "debug".to_string(),
    }
}

fn bridge(node: ScriptedNode) -> (Arc<ScriptedNode>, Manager) {
    let node = Arc::new(node);
    let manager = build_manager(&test_config(), node.clone());
    (node, manager)
}

#[tokio::test]
async fn test_create_contract_end_to_end() {
    let (node, manager) = bridge(
        ScriptedNode::default()
            .reply("fromhexaddress", RawReply::ok(json!("qUbxboqjBRp96j3La8D1RYkyqx5uQbJPoW")))
            .reply(
                "createcontract",
                RawReply::ok(json!({
                    "txid": "abc123",
                    "sender": "qUbxboqjBRp96j3La8D1RYkyqx5uQbJPoW",
                    "hash160": "b60e8dd61c5d32be8058bb8eb970870f07233155",
                    "address": "c5d5b6f0e8fa2ff6e8ce21cb3b57ce2a4a6a8a5b"
                })),
            ),
    );

    let result = manager
        .handle(
            "eth_sendTransaction",
            json!([{
                "from": "0xb60e8dd61c5d32be8058bb8eb970870f07233155",
                "gas": "0x3d0900",
                "gasPrice": "0x64",
                "data": "0x60606040"
            }]),
        )
        .await
        .unwrap();

    assert_eq!(result, json!("0xabc123"));
    assert_eq!(node.methods_called(), vec!["fromhexaddress", "createcontract"]);
    assert_eq!(
        node.params_of("createcontract").unwrap(),
        vec![
            json!("60606040"),
            json!(4_000_000),
            json!("0.00000100"),
            json!("qUbxboqjBRp96j3La8D1RYkyqx5uQbJPoW")
        ]
    );
}

#[tokio::test]
async fn test_create_contract_with_value_never_reaches_node() {
    let (node, manager) = bridge(ScriptedNode::default());
    let err = manager
        .handle(
            "eth_sendTransaction",
            json!([{ "value": "0xde0b6b3a7640000", "data": "0x6060" }]),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), INVALID_PARAMS_CODE);
    assert_eq!(err.to_string(), "value must be empty");
    assert!(node.methods_called().is_empty());
}

#[tokio::test]
async fn test_create_contract_empty_reply_is_protocol_error() {
    let (_, manager) = bridge(ScriptedNode::default());
    let err = manager
        .handle("eth_sendTransaction", json!([{ "data": "0x6060" }]))
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Protocol(_)));
    assert_eq!(err.code(), INTERNAL_ERROR_CODE);
}

#[tokio::test]
async fn test_create_contract_node_error_is_upstream() {
    let (_, manager) = bridge(ScriptedNode::default().reply(
        "createcontract",
        RawReply::err(QtumRpcError {
            code: -4,
            message: "Insufficient funds".to_string(),
            data: None,
        }),
    ));
    let err = manager
        .handle("eth_sendTransaction", json!([{ "data": "0x6060" }]))
        .await
        .unwrap_err();

    assert_eq!(err.code(), CALL_FAILED_CODE);
    assert_eq!(err.to_string(), "Insufficient funds");
}

#[tokio::test]
async fn test_get_storage_at_end_to_end() {
    let slot_zero = "0".repeat(64);
    let (node, manager) = bridge(
        ScriptedNode::default()
            .reply("getblockcount", RawReply::ok(json!(4321)))
            .reply(
                "getstorage",
                RawReply::ok(json!([
                    { slot_zero: "000000000000000000000000000000000000000000000000000000000000beef" }
                ])),
            ),
    );

    let hit = manager
        .handle(
            "eth_getStorageAt",
            json!(["0x295a70b2de5e3953354a6a8344e616ed314d7251", "0x0", "latest"]),
        )
        .await
        .unwrap();
    assert_eq!(
        hit,
        json!("0x000000000000000000000000000000000000000000000000000000000000beef")
    );
    assert_eq!(
        node.params_of("getstorage").unwrap(),
        vec![json!("295a70b2de5e3953354a6a8344e616ed314d7251"), json!(4321)]
    );

    let miss = manager
        .handle(
            "eth_getStorageAt",
            json!(["0x295a70b2de5e3953354a6a8344e616ed314d7251", "0x1", "0x10"]),
        )
        .await
        .unwrap();
    assert_eq!(
        miss,
        json!("0x0000000000000000000000000000000000000000000000000000000000000000")
    );
}

#[tokio::test]
async fn test_unsupported_method() {
    let (node, manager) = bridge(ScriptedNode::default());
    let err = manager.handle("eth_sendRawTransaction", json!(["0x00"])).await.unwrap_err();
    assert!(matches!(err, BridgeError::MethodNotSupported(_)));
    assert!(node.methods_called().is_empty());
}
