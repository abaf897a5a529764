//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Fill nonce, fees, chain ID and gas limit
//! - Sign locally and broadcast the raw transaction
//! - Block until a receipt is mined, bounded by a timeout

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::ChainRpc;
use crate::blockchain::contract;
use crate::blockchain::gas::resolve_fees;
use crate::blockchain::types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ConfirmationStatus, MinedReceipt,
};
use crate::blockchain::wallet::Wallet;

/// Limits applied while sending transactions.
#[derive(Debug, Clone, Copy)]
pub struct TxSettings {
    pub poll_interval: Duration,
    pub confirmation_timeout: Duration,
    pub max_gas_price_gwei: u64,
}

impl From<&BlockchainConfig> for TxSettings {
    fn from(config: &BlockchainConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            confirmation_timeout: Duration::from_secs(config.confirmation_timeout_secs),
            max_gas_price_gwei: config.max_gas_price_gwei,
        }
    }
}

/// Transaction builder for the bot's on-chain actions.
pub struct TxBuilder<C> {
    chain: C,
    wallet: Wallet,
    settings: TxSettings,
}

impl<C> TxBuilder<C> {
    /// Plain native-currency transfer.
    pub fn transfer_request(to: Address, value: U256) -> TransactionRequest {
        TransactionRequest::default().with_to(to).with_value(value)
    }

    /// `deposit()` on the wrapped token, paying `value`.
    pub fn deposit_request(token: Address, value: U256) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(token)
            .with_value(value)
            .with_input(contract::deposit_calldata())
    }

    /// `withdraw(wad)` on the wrapped token; no value attached.
    pub fn withdraw_request(token: Address, wad: U256) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(token)
            .with_input(contract::withdraw_calldata(wad))
    }
}

impl<C: ChainRpc> TxBuilder<C> {
    /// Create a new transaction builder.
    pub fn new(chain: C, wallet: Wallet, settings: TxSettings) -> Self {
        Self {
            chain,
            wallet,
            settings,
        }
    }

    /// Fill, sign, broadcast and wait for the receipt.
    ///
    /// Only successful receipts are returned; reverts become
    /// [`BlockchainError::Reverted`].
    pub async fn send_and_confirm(
        &self,
        tx: TransactionRequest,
        gas_limit: u64,
    ) -> BlockchainResult<MinedReceipt> {
        let nonce = self.chain.get_transaction_count(self.wallet.address()).await?;

        let fees = resolve_fees(&self.chain).await?;
        fees.check_cap(self.settings.max_gas_price_gwei)?;

        let tx = fees
            .apply(tx)
            .with_nonce(nonce)
            .with_chain_id(self.wallet.chain_id())
            .with_gas_limit(gas_limit);

        let raw = self.wallet.sign_transaction(tx).await?;
        let tx_hash = self.chain.send_raw_transaction(raw).await?;
        tracing::debug!(tx_hash = %tx_hash, nonce, "Transaction submitted");

        let receipt = self.wait_for_receipt(tx_hash).await?;
        match ConfirmationStatus::from_receipt(Some(&receipt)) {
            ConfirmationStatus::Confirmed { .. } => Ok(receipt),
            _ => Err(BlockchainError::Reverted(tx_hash)),
        }
    }

    /// Poll until `tx_hash` has a receipt or the confirmation timeout passes.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<MinedReceipt> {
        let result = timeout(self.settings.confirmation_timeout, async {
            let mut ticker = interval(self.settings.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match self.chain.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                    // Transient RPC errors do not end the wait.
                    Err(e) => tracing::debug!(tx_hash = %tx_hash, error = %e, "Receipt query failed"),
                }
            }
        })
        .await;

        result.map_err(|_| {
            BlockchainError::ConfirmationTimeout(tx_hash, self.settings.confirmation_timeout.as_secs())
        })
    }

    /// Native balance of the wallet.
    pub async fn native_balance(&self) -> BlockchainResult<U256> {
        self.chain.get_balance(self.wallet.address()).await
    }

    /// Wrapped token balance of the wallet.
    pub async fn token_balance(&self, token: Address) -> BlockchainResult<U256> {
        let data = self
            .chain
            .call(token, contract::balance_of_calldata(self.wallet.address()))
            .await?;
        contract::decode_balance_of(&data)
    }

    pub async fn token_decimals(&self, token: Address) -> BlockchainResult<u8> {
        let data = self.chain.call(token, contract::decimals_calldata()).await?;
        contract::decode_decimals(&data)
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shapes() {
        let token = Address::repeat_byte(0x11);
        let amount = U256::from(5u64);

        let deposit = TxBuilder::<()>::deposit_request(token, amount);
        assert_eq!(deposit.value, Some(amount));
        assert_eq!(deposit.input.input().map(|b| b.len()), Some(4));

        let withdraw = TxBuilder::<()>::withdraw_request(token, amount);
        assert_eq!(withdraw.value, None);
        assert_eq!(withdraw.input.input().map(|b| b.len()), Some(36));

        let transfer = TxBuilder::<()>::transfer_request(token, amount);
        assert_eq!(transfer.value, Some(amount));
        assert!(transfer.input.input().is_none());
    }

    #[test]
    fn test_settings_from_config() {
        let settings = TxSettings::from(&BlockchainConfig::default());
        assert_eq!(settings.poll_interval, Duration::from_millis(2000));
        assert_eq!(settings.confirmation_timeout, Duration::from_secs(120));
    }
}
