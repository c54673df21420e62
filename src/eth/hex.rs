//! Helpers for Ethereum's `0x`-prefixed hex conventions.

use ethereum_types::U256;

/// Remove a leading `0x`/`0X`, if any.
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Prefix `value` with `0x` unless it already carries one.
pub fn add_hex_prefix(value: &str) -> String {
    if value.starts_with("0x") || value.starts_with("0X") {
        value.to_string()
    } else {
        format!("0x{}", value)
    }
}

pub fn is_hex_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// `0x` followed by exactly 40 hex digits.
pub fn is_eth_address(value: &str) -> bool {
    let stripped = strip_hex_prefix(value);
    stripped.len() != value.len() && stripped.len() == 40 && is_hex_digits(stripped)
}

/// Parse a hex quantity such as `0x76c0` into a 256-bit integer.
pub fn parse_quantity(value: &str) -> Result<U256, String> {
    let digits = strip_hex_prefix(value);
    if digits.is_empty() || digits.len() > 64 || !is_hex_digits(digits) {
        return Err(format!("invalid hex quantity: {:?}", value));
    }
    U256::from_str_radix(digits, 16).map_err(|e| format!("invalid hex quantity {:?}: {:?}", value, e))
}
