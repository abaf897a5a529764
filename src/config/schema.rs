//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bot.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the Pharos bot.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BotConfig {
    /// Rewards REST API settings.
    pub api: ApiConfig,

    /// Blockchain integration settings.
    pub blockchain: BlockchainConfig,

    /// Task pacing, amounts and gas limits.
    pub tasks: TaskConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Rewards API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,

    /// `Origin` header sent with every request.
    pub origin: String,

    /// `Referer` header sent with every request.
    pub referer: String,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.pharosnetwork.xyz".to_string(),
            origin: "https://testnet.pharosnetwork.xyz".to_string(),
            referer: "https://testnet.pharosnetwork.xyz/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID used for EIP-155 replay protection.
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Upper bound on how long to wait for a mined receipt.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,

    /// Wrapped native token contract (deposit/withdraw).
    pub wrapped_token: String,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://testnet.dplabs-internal.com".to_string(),
            chain_id: 688688,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
            max_gas_price_gwei: 500,
            wrapped_token: "0x76aaada469d23216be5f7c596fa25f282ff9b364".to_string(),
        }
    }
}

/// Range of native amounts, in whole units (e.g. 0.001 PHRS).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AmountRangeConfig {
    pub min: f64,
    pub max: f64,
}

/// Task configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Fixed pause between dependent on-chain steps, in seconds.
    pub step_delay_secs: u64,

    /// Amount range for self-transfers.
    pub transfer_amount: AmountRangeConfig,

    /// Amount range for wrap/unwrap swaps.
    pub swap_amount: AmountRangeConfig,

    /// Gas limit for plain native transfers.
    pub transfer_gas_limit: u64,

    /// Gas limit for wrapped token deposit/withdraw calls.
    pub contract_gas_limit: u64,

    /// Task identifier submitted after each self-transfer.
    pub send_task_id: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            step_delay_secs: 5,
            transfer_amount: AmountRangeConfig { min: 0.001, max: 0.01 },
            swap_amount: AmountRangeConfig { min: 0.001, max: 0.005 },
            transfer_gas_limit: 21_000,
            contract_gas_limit: 50_000,
            send_task_id: 103,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_testnet() {
        let config = BotConfig::default();
        assert_eq!(config.blockchain.chain_id, 688688);
        assert_eq!(config.tasks.send_task_id, 103);
        assert_eq!(config.tasks.transfer_gas_limit, 21_000);
        assert_eq!(config.api.request_timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: BotConfig = toml::from_str(
            r#"
            [tasks]
            step_delay_secs = 1

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.tasks.step_delay_secs, 1);
        assert_eq!(config.tasks.contract_gas_limit, 50_000);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.blockchain.poll_interval_ms, 2000);
    }
}
