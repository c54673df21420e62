use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use jsonrpsee::server::{RpcModule, Server};
use jsonrpsee::types::ErrorObjectOwned;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::BridgeError;
use crate::qtum::{NodeClient, QtumClient};
use crate::transformer::{CreateContract, GetStorageAt, Manager};

/// Build the method registry. Every supported Ethereum method is listed here.
pub fn build_manager(config: &Config, node: Arc<dyn NodeClient>) -> Manager {
    Manager::new(node)
        .register(CreateContract::new(config.gas_defaults))
        .register(GetStorageAt)
}

/// Start the JSON-RPC server.
pub async fn start_server(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.bridge_rpc_port));

    info!("Starting bridge RPC server on {}", addr);
    info!("Qtum RPC: {}", config.qtum_rpc_url);

    let qtum_client = QtumClient::new(
        &config.qtum_rpc_url,
        config.qtum_credentials(),
        config.qtum_rpc_timeout,
    )?;

    // Check Qtum RPC health
    match qtum_client.get_block_count().await {
        Ok(height) => info!("Qtum node reachable, block height {}", height),
        Err(e) => warn!("Could not reach Qtum RPC (will retry on requests): {}", e),
    }

    let manager = build_manager(&config, Arc::new(qtum_client));
    let methods: Vec<&'static str> = manager.methods().collect();

    let mut module = RpcModule::new(manager);
    register_methods(&mut module, methods)?;

    let cors = CorsLayer::new()
        .allow_methods([http::Method::POST])
        .allow_origin(Any)
        .allow_headers([http::header::CONTENT_TYPE]);
    let middleware = tower::ServiceBuilder::new().layer(cors);

    let server = Server::builder()
        .set_http_middleware(middleware)
        .build(addr)
        .await
        .map_err(|e| anyhow!("Failed to bind server to {}: {}", addr, e))?;

    info!("Bridge RPC server listening on http://{}", addr);

    let handle = server.start(module);

    // Wait for the server to finish (runs until shutdown signal)
    handle.stopped().await;

    info!("Bridge RPC server stopped");
    Ok(())
}

/// Register one JSON-RPC method per transformer known to the manager.
fn register_methods(module: &mut RpcModule<Manager>, methods: Vec<&'static str>) -> Result<()> {
    for method in methods {
        module.register_async_method(method, move |params, manager, _| async move {
            let result: Result<Value, ErrorObjectOwned> = match params.parse::<Value>() {
                Ok(params) => manager.handle(method, params).await.map_err(Into::into),
                Err(e) => Err(BridgeError::invalid_params(e.message()).into()),
            };
            result
        })?;
        info!("Registered {}", method);
    }

    Ok(())
}
