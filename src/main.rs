//! Ethereum JSON-RPC to Qtum bridge
//!
//! Entry point for the bridge server. Loads configuration from
//! environment/.env file and starts the JSON-RPC server on the configured
//! port.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qtum_eth_rpc::config::Config;
use qtum_eth_rpc::server::start_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .init();

    info!("=== Qtum Ethereum RPC Bridge ===");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  RPC Port: {}", config.bridge_rpc_port);
    info!("  Qtum RPC: {}", config.qtum_rpc_url);
    info!(
        "  Default gas: limit={}, price={} satoshi",
        config.gas_defaults.gas_limit, config.gas_defaults.gas_price
    );

    start_server(config).await?;

    Ok(())
}
