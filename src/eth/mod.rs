pub mod hex;
pub mod types;

pub use types::{BlockReference, BlockTag, GetStorageRequest, SendTransactionParams, TransactionReq};
