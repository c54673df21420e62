use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::transformer::GasDefaults;

/// Bridge configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qtum node RPC endpoint URL
    pub qtum_rpc_url: String,
    /// Qtum RPC user (basic auth)
    pub qtum_rpc_user: Option<String>,
    /// Qtum RPC password (basic auth)
    pub qtum_rpc_password: Option<String>,
    /// Timeout for a single node call
    pub qtum_rpc_timeout: Duration,
    /// RPC server port
    pub bridge_rpc_port: u16,
    /// Gas limit/price used when a transaction leaves them out
    pub gas_defaults: GasDefaults,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Call dotenvy::dotenv() before calling this.
    pub fn from_env() -> Result<Self> {
        let qtum_rpc_url =
            env::var("QTUM_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:3889".to_string());

        let qtum_rpc_user = env::var("QTUM_RPC_USER").ok();
        let qtum_rpc_password = env::var("QTUM_RPC_PASSWORD").ok();

        let timeout_secs: u64 = env::var("QTUM_RPC_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("QTUM_RPC_TIMEOUT_SECS must be a valid u64")?;

        let bridge_rpc_port: u16 = env::var("BRIDGE_RPC_PORT")
            .unwrap_or_else(|_| "23889".to_string())
            .parse()
            .context("BRIDGE_RPC_PORT must be a valid u16")?;

        let defaults = GasDefaults::default();
        let gas_limit: u64 = match env::var("BRIDGE_DEFAULT_GAS_LIMIT") {
            Ok(v) => v
                .parse()
                .context("BRIDGE_DEFAULT_GAS_LIMIT must be a valid u64")?,
            Err(_) => defaults.gas_limit,
        };
        let gas_price: u64 = match env::var("BRIDGE_DEFAULT_GAS_PRICE") {
            Ok(v) => v
                .parse()
                .context("BRIDGE_DEFAULT_GAS_PRICE must be a valid u64 (satoshi)")?,
            Err(_) => defaults.gas_price,
        };

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            qtum_rpc_url,
            qtum_rpc_user,
            qtum_rpc_password,
            qtum_rpc_timeout: Duration::from_secs(timeout_secs),
            bridge_rpc_port,
            gas_defaults: GasDefaults {
                gas_limit,
                gas_price,
            },
            log_level,
        })
    }

    /// Basic auth credentials, if a user is configured.
    pub fn qtum_credentials(&self) -> Option<(String, String)> {
        self.qtum_rpc_user.clone().map(|user| {
            (user, self.qtum_rpc_password.clone().unwrap_or_default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            qtum_rpc_url: "http://127.0.0.1:3889".to_string(),
            qtum_rpc_user: None,
            qtum_rpc_password: None,
            qtum_rpc_timeout: Duration::from_secs(30),
            bridge_rpc_port: 23889,
            gas_defaults: GasDefaults::default(),
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_credentials() {
        let mut config = config();
        assert_eq!(config.qtum_credentials(), None);

        config.qtum_rpc_user = Some("qtum".to_string());
        assert_eq!(
            config.qtum_credentials(),
            Some(("qtum".to_string(), String::new()))
        );

        config.qtum_rpc_password = Some("testpasswd".to_string());
        assert_eq!(
            config.qtum_credentials(),
            Some(("qtum".to_string(), "testpasswd".to_string()))
        );
    }
}
