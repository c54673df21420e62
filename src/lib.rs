//! Ethereum JSON-RPC to Qtum RPC bridge
//!
//! This crate implements a JSON-RPC server that accepts Ethereum-style calls
//! and translates them into the Qtum node's native RPC dialect, so EVM tooling
//! can deploy and inspect contracts on Qtum.
//!
//! # Architecture
//!
//! ```text
//! Developer (ethers.js/web3.js/Truffle)
//!     |
//!     | eth_* JSON-RPC calls
//!     v
//! Bridge (this crate): Manager -> Transformer::prepare
//!     |
//!     | createcontract / getstorage / ...
//!     v
//! qtumd  -> Transformer::finish -> Ethereum-shaped result
//! ```
//!
//! # Modules
//!
//! - `config` - Environment and configuration management
//! - `server` - JSON-RPC server setup and method registration
//! - `transformer` - Per-method request/response translation and the registry
//! - `eth` - Ethereum-side wire types and hex conventions
//! - `qtum` - Qtum RPC client and node-side wire types
//! - `error` - Error taxonomy and JSON-RPC error codes

pub mod config;
pub mod error;
pub mod eth;
pub mod qtum;
pub mod server;
pub mod transformer;
