//! Gas conversion between the Ethereum and Qtum conventions.
//!
//! Ethereum callers send `gas` and `gasPrice` as hex quantities. Qtum's
//! `createcontract` takes the gas limit as a plain integer and the gas price
//! as a decimal QTUM amount. The bridge reads `gasPrice` as satoshi per gas
//! (1 QTUM = 10^8 satoshi), so the conversion is a decimal point shift and
//! exact for every 256-bit input.

use ethereum_types::U256;

use crate::error::{BridgeError, BridgeResult};
use crate::eth::hex::parse_quantity;

/// Number of fractional digits in a QTUM amount.
pub const QTUM_DECIMALS: usize = 8;

/// Values used when the caller leaves `gas` / `gasPrice` out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasDefaults {
    pub gas_limit: u64,
    /// Satoshi per gas unit
    pub gas_price: u64,
}

impl Default for GasDefaults {
    fn default() -> Self {
        Self {
            gas_limit: 2_500_000,
            gas_price: 40,
        }
    }
}

/// Convert the optional `gas` and `gasPrice` of a transaction into
/// `createcontract`'s gas limit and gas price arguments.
pub fn eth_gas_to_qtum(
    gas: Option<&str>,
    gas_price: Option<&str>,
    defaults: &GasDefaults,
) -> BridgeResult<(u64, String)> {
    let gas_limit = match gas {
        Some(gas) => gas_limit_to_qtum(gas)?,
        None => defaults.gas_limit,
    };
    let satoshi = match gas_price {
        Some(price) => parse_quantity(price)
            .map_err(|e| BridgeError::invalid_params(format!("gasPrice: {}", e)))?,
        None => U256::from(defaults.gas_price),
    };
    Ok((gas_limit, satoshi_to_qtum_amount(satoshi)))
}

pub fn gas_limit_to_qtum(gas: &str) -> BridgeResult<u64> {
    let limit = parse_quantity(gas).map_err(|e| BridgeError::invalid_params(format!("gas: {}", e)))?;
    if limit > U256::from(u64::MAX) {
        return Err(BridgeError::invalid_params(format!("gas: {} exceeds 64 bits", gas)));
    }
    Ok(limit.as_u64())
}

/// Format a satoshi amount as a QTUM decimal string, e.g. 40 -> "0.00000040".
pub fn satoshi_to_qtum_amount(satoshi: U256) -> String {
    let digits = format!("{:0>width$}", satoshi.to_string(), width = QTUM_DECIMALS + 1);
    let (whole, fraction) = digits.split_at(digits.len() - QTUM_DECIMALS);
    format!("{}.{}", whole, fraction)
}

/// Inverse of [`satoshi_to_qtum_amount`]. Amounts with more than eight
/// fractional digits are rejected rather than rounded.
pub fn qtum_amount_to_satoshi(amount: &str) -> Result<U256, String> {
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty()
        || fraction.len() > QTUM_DECIMALS
        || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
    {
        return Err(format!("invalid QTUM amount: {:?}", amount));
    }
    let digits = format!("{}{:0<width$}", whole, fraction, width = QTUM_DECIMALS);
    U256::from_dec_str(&digits).map_err(|e| format!("invalid QTUM amount {:?}: {:?}", amount, e))
}
