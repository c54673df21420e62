//! `eth_sendTransaction` without a recipient -> Qtum `createcontract`.
//!
//! ```text
//! eth:  [{ "from": "0xb60e...", "gas": "0x76c0", "gasPrice": "0x28", "data": "0x6060..." }]
//! qtum: createcontract "6060..." 30400 "0.00000040" "qUbx..."
//! ```
//!
//! `createcontract` answers `{ "txid", "sender", "hash160", "address" }`; the
//! caller gets the `0x`-prefixed txid.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::gas::{eth_gas_to_qtum, GasDefaults};
use super::Transformer;
use crate::error::{BridgeError, BridgeResult};
use crate::eth::hex::{add_hex_prefix, is_eth_address, strip_hex_prefix};
use crate::eth::SendTransactionParams;
use crate::qtum::types::METHOD_CREATECONTRACT;
use crate::qtum::{CreateContractResult, NodeClient, RawReply, TranslatedCall};

pub struct CreateContract {
    gas_defaults: GasDefaults,
}

impl CreateContract {
    pub fn new(gas_defaults: GasDefaults) -> Self {
        Self { gas_defaults }
    }
}

#[async_trait]
impl Transformer for CreateContract {
    const METHOD: &'static str = "eth_sendTransaction";

    type Params = SendTransactionParams;
    type State = ();
    type Response = String;

    async fn prepare(
        &self,
        params: SendTransactionParams,
        node: &dyn NodeClient,
    ) -> BridgeResult<(TranslatedCall, ())> {
        let SendTransactionParams(tx) = params;
        match tx.has_value() {
            Ok(false) => {}
            Ok(true) => return Err(BridgeError::invalid_params("value must be empty")),
            Err(e) => return Err(BridgeError::invalid_params(format!("value: {}", e))),
        }
        if tx.has_recipient() {
            return Err(BridgeError::invalid_params(
                "only contract creation is supported; omit `to`",
            ));
        }

        let data = tx
            .call_data()
            .map_err(BridgeError::invalid_params)?
            .ok_or_else(|| BridgeError::invalid_params("data: contract bytecode is required"))?;
        let bytecode = strip_hex_prefix(data);
        if bytecode.is_empty() || hex::decode(bytecode).is_err() {
            return Err(BridgeError::invalid_params(format!(
                "data: invalid contract bytecode {:?}",
                data
            )));
        }

        let (gas_limit, gas_price) =
            eth_gas_to_qtum(tx.gas.as_deref(), tx.gas_price.as_deref(), &self.gas_defaults)?;

        let mut params = vec![
            Value::from(bytecode),
            Value::from(gas_limit),
            Value::from(gas_price),
        ];

        if let Some(from) = tx.from.as_deref().filter(|from| !from.is_empty()) {
            let sender = if is_eth_address(from) {
                node.from_hex_address(strip_hex_prefix(from))
                    .await
                    .map_err(|e| {
                        BridgeError::invalid_params(format!(
                            "from: cannot resolve address {}: {}",
                            from, e
                        ))
                    })?
            } else {
                from.to_string()
            };
            debug!("sender {} -> {}", from, sender);
            params.push(Value::from(sender));
        }

        Ok((TranslatedCall::new(METHOD_CREATECONTRACT, params), ()))
    }

    fn finish(&self, _state: (), reply: RawReply) -> BridgeResult<String> {
        if let Some(err) = reply.error {
            return Err(err.into());
        }
        let result = reply.result.ok_or_else(|| {
            BridgeError::protocol("createcontract returned neither a result nor an error")
        })?;
        let created: CreateContractResult = serde_json::from_value(result).map_err(|e| {
            BridgeError::protocol(format!("unexpected createcontract result: {}", e))
        })?;
        debug!(
            "contract creation submitted: txid={}, address={:?}",
            created.txid, created.address
        );
        Ok(add_hex_prefix(&created.txid))
    }
}
