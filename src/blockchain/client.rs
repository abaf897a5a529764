//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint
//! - Query chain state (balances, nonces, fees, receipts)
//! - Handle timeouts and network errors gracefully
//! - Expose the [`ChainRpc`] seam the orchestrator is written against

use alloy::eips::BlockNumberOrTag;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use std::fmt::Display;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ChainId, MinedReceipt,
};

/// The chain operations the bot needs.
///
/// Implemented by [`BlockchainClient`] against a live node; tests provide an
/// in-memory ledger.
#[allow(async_fn_in_trait)]
pub trait ChainRpc {
    /// Native balance in wei.
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256>;

    /// Next nonce for `address`, counting transactions still in the mempool.
    async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64>;

    /// Base fee of the latest block, `None` on nodes without EIP-1559.
    async fn get_latest_base_fee(&self) -> BlockchainResult<Option<u128>>;

    async fn get_max_priority_fee(&self) -> BlockchainResult<u128>;

    /// Legacy gas price in wei.
    async fn get_gas_price(&self) -> BlockchainResult<u128>;

    /// Read-only `eth_call`.
    async fn call(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes>;

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash>;

    async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<MinedReceipt>>;
}

/// Blockchain RPC client wrapper (the bot's chain connection).
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Chain ID verification failures are logged, not returned.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);

        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        let client = Self {
            provider,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.with_timeout("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    async fn with_timeout<T, E, F>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::debug!(method, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{}: {}", method, e)))
            }
            Err(_) => {
                tracing::debug!(method, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }
}

impl ChainRpc for BlockchainClient {
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.with_timeout("eth_getBalance", self.provider.get_balance(address))
            .await
    }

    async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.with_timeout(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn get_latest_base_fee(&self) -> BlockchainResult<Option<u128>> {
        let block = self
            .with_timeout(
                "eth_getBlockByNumber",
                self.provider.get_block_by_number(BlockNumberOrTag::Latest),
            )
            .await?
            .ok_or_else(|| BlockchainError::Rpc("latest block not found".to_string()))?;
        Ok(block.header.base_fee_per_gas.map(u128::from))
    }

    async fn get_max_priority_fee(&self) -> BlockchainResult<u128> {
        self.with_timeout(
            "eth_maxPriorityFeePerGas",
            self.provider.get_max_priority_fee_per_gas(),
        )
        .await
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.with_timeout("eth_gasPrice", self.provider.get_gas_price())
            .await
    }

    async fn call(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(data);
        self.with_timeout("eth_call", self.provider.call(request))
            .await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let pending = self
            .with_timeout(
                "eth_sendRawTransaction",
                self.provider.send_raw_transaction(&raw),
            )
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<MinedReceipt>> {
        let receipt = self
            .with_timeout(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?;
        Ok(receipt.map(|r| MinedReceipt {
            tx_hash: r.transaction_hash,
            block_number: r.block_number.unwrap_or_default(),
            success: r.status(),
        }))
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
