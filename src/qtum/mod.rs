pub mod client;
pub mod node;
pub mod types;

pub use client::QtumClient;
pub use node::{NodeClient, NodeError};
pub use types::{
    CreateContractResult, QtumRpcError, RawReply, StorageEntries, TranslatedCall,
};
