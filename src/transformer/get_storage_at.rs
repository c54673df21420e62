//! `eth_getStorageAt` -> Qtum `getstorage`.
//!
//! `getstorage` returns the whole storage of the contract at a height, so the
//! requested slot stays on the bridge and is looked up in the reply.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::block::resolve_block_number;
use super::Transformer;
use crate::error::{BridgeError, BridgeResult};
use crate::eth::hex::{add_hex_prefix, is_hex_digits, strip_hex_prefix};
use crate::eth::GetStorageRequest;
use crate::qtum::types::METHOD_GETSTORAGE;
use crate::qtum::{NodeClient, RawReply, StorageEntries, TranslatedCall};

/// Hex digits in a 32-byte storage word.
pub const STORAGE_WORD_DIGITS: usize = 64;

/// Value of storage that was never written.
pub const ZERO_WORD: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

pub struct GetStorageAt;

#[async_trait]
impl Transformer for GetStorageAt {
    const METHOD: &'static str = "eth_getStorageAt";

    type Params = GetStorageRequest;
    /// Unprefixed slot index, at most 64 digits
    type State = String;
    type Response = String;

    async fn prepare(
        &self,
        req: GetStorageRequest,
        node: &dyn NodeClient,
    ) -> BridgeResult<(TranslatedCall, String)> {
        let address = strip_hex_prefix(&req.address);
        if address.len() != 40 || !is_hex_digits(address) {
            return Err(BridgeError::invalid_params(format!(
                "address: expected 20-byte hex address, got {:?}",
                req.address
            )));
        }
        let slot = parse_slot(&req.index)?;

        let block_number = match resolve_block_number(node, &req.block).await {
            Ok(number) => number,
            Err(e) => {
                debug!("Failed to get block number for {:?}: {}", req.block, e);
                return Err(e);
            }
        };

        let params = vec![
            Value::from(address.to_ascii_lowercase()),
            Value::from(block_number),
        ];
        Ok((TranslatedCall::new(METHOD_GETSTORAGE, params), slot))
    }

    fn finish(&self, slot: String, reply: RawReply) -> BridgeResult<String> {
        if let Some(err) = reply.error {
            return Err(err.into());
        }
        let result = reply.result.ok_or_else(|| {
            BridgeError::protocol("getstorage returned neither a result nor an error")
        })?;
        let entries: StorageEntries = serde_json::from_value(result)
            .map_err(|e| BridgeError::protocol(format!("unexpected getstorage result: {}", e)))?;

        let key = left_pad_slot(&slot);
        match entries.find(&key) {
            Some(value) => Ok(add_hex_prefix(value)),
            None => {
                debug!("slot {} not set, returning zero word", key);
                Ok(ZERO_WORD.to_string())
            }
        }
    }
}

/// Validate a slot index and strip its prefix. Surplus leading zeros beyond
/// 64 digits are dropped; anything wider than 256 bits is rejected.
fn parse_slot(index: &str) -> BridgeResult<String> {
    let digits = strip_hex_prefix(index);
    if !is_hex_digits(digits) {
        return Err(BridgeError::invalid_params(format!(
            "index: invalid hex slot {:?}",
            index
        )));
    }
    let digits = if digits.len() > STORAGE_WORD_DIGITS {
        let surplus = digits.len() - STORAGE_WORD_DIGITS;
        if digits[..surplus].bytes().any(|b| b != b'0') {
            return Err(BridgeError::invalid_params(format!(
                "index: slot {:?} exceeds 32 bytes",
                index
            )));
        }
        &digits[surplus..]
    } else {
        digits
    };
    Ok(digits.to_ascii_lowercase())
}

/// Left-pad a slot with zeros to a full 64-digit storage key.
fn left_pad_slot(slot: &str) -> String {
    format!("{:0>width$}", slot, width = STORAGE_WORD_DIGITS)
}
