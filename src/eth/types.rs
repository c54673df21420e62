use serde::{Deserialize, Deserializer};

use super::hex::{is_hex_digits, parse_quantity, strip_hex_prefix};

/// Transaction object of `eth_sendTransaction`.
///
/// Fields the bridge does not translate (`nonce`, `chainId`, ...) are
/// accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReq {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub gas: Option<String>,
    #[serde(default)]
    pub gas_price: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
}

impl TransactionReq {
    /// Whether the transaction moves a non-zero amount.
    pub fn has_value(&self) -> Result<bool, String> {
        match self.value.as_deref() {
            None | Some("") | Some("0x") | Some("0X") => Ok(false),
            Some(value) => Ok(!parse_quantity(value)?.is_zero()),
        }
    }

    /// Call data from `input` or `data`. Both may be sent, but then they
    /// must agree.
    pub fn call_data(&self) -> Result<Option<&str>, String> {
        match (self.input.as_deref(), self.data.as_deref()) {
            (Some(input), Some(data)) if input != data => Err(format!(
                "both input and data set and not equal ({:?} != {:?})",
                input, data
            )),
            (Some(input), _) => Ok(Some(input)),
            (None, data) => Ok(data),
        }
    }

    /// Whether a recipient is set, i.e. this is a call rather than a creation.
    pub fn has_recipient(&self) -> bool {
        self.to
            .as_deref()
            .map(|to| !strip_hex_prefix(to).is_empty())
            .unwrap_or(false)
    }
}

/// Positional params of `eth_sendTransaction`: `[transaction]`.
#[derive(Debug, Clone)]
pub struct SendTransactionParams(pub TransactionReq);

impl<'de> Deserialize<'de> for SendTransactionParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (tx,) = <(TransactionReq,)>::deserialize(deserializer)?;
        Ok(SendTransactionParams(tx))
    }
}

/// Positional params of `eth_getStorageAt`: `[address, index, block]`.
#[derive(Debug, Clone)]
pub struct GetStorageRequest {
    pub address: String,
    pub index: String,
    pub block: BlockReference,
}

impl<'de> Deserialize<'de> for GetStorageRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (address, index, block) = <(String, String, BlockReference)>::deserialize(deserializer)?;
        Ok(GetStorageRequest {
            address,
            index,
            block,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Earliest,
    Pending,
    Safe,
    Finalized,
}

/// A block parameter: tag, number, or hash (EIP-1898 objects included).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBlockReference")]
pub enum BlockReference {
    Tag(BlockTag),
    Number(u64),
    /// Unprefixed, lowercase 32-byte hash
    Hash(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBlockReference {
    Str(String),
    #[serde(rename_all = "camelCase")]
    Object {
        #[serde(default)]
        block_number: Option<String>,
        #[serde(default)]
        block_hash: Option<String>,
    },
}

impl TryFrom<RawBlockReference> for BlockReference {
    type Error = String;

    fn try_from(raw: RawBlockReference) -> Result<Self, Self::Error> {
        match raw {
            RawBlockReference::Str(s) => s.parse(),
            RawBlockReference::Object {
                block_number: Some(number),
                block_hash: None,
            } => match number.parse::<BlockReference>()? {
                reference @ (BlockReference::Number(_) | BlockReference::Tag(_)) => Ok(reference),
                BlockReference::Hash(_) => Err(format!("blockNumber is a hash: {}", number)),
            },
            RawBlockReference::Object {
                block_number: None,
                block_hash: Some(hash),
            } => parse_block_hash(&hash)
                .map(BlockReference::Hash)
                .ok_or_else(|| format!("invalid block hash: {}", hash)),
            RawBlockReference::Object { .. } => {
                Err("block object needs exactly one of blockNumber or blockHash".to_string())
            }
        }
    }
}

impl std::str::FromStr for BlockReference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s {
            "latest" => Some(BlockTag::Latest),
            "earliest" => Some(BlockTag::Earliest),
            "pending" => Some(BlockTag::Pending),
            "safe" => Some(BlockTag::Safe),
            "finalized" => Some(BlockTag::Finalized),
            _ => None,
        };
        if let Some(tag) = tag {
            return Ok(BlockReference::Tag(tag));
        }
        if let Some(hash) = parse_block_hash(s) {
            return Ok(BlockReference::Hash(hash));
        }

        let digits = strip_hex_prefix(s);
        if digits.len() == s.len() || digits.is_empty() || !is_hex_digits(digits) {
            return Err(format!("invalid block reference: {}", s));
        }
        u64::from_str_radix(digits, 16)
            .map(BlockReference::Number)
            .map_err(|_| format!("block number out of range: {}", s))
    }
}

fn parse_block_hash(s: &str) -> Option<String> {
    let digits = strip_hex_prefix(s);
    (digits.len() != s.len() && digits.len() == 64 && is_hex_digits(digits))
        .then(|| digits.to_ascii_lowercase())
}
