//! Wallet management and signing.
//!
//! # Security
//! - Private keys come from the environment or an interactive prompt
//! - Keys are never logged or serialized

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, Signer};

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::observability::logging::mask_address;

/// The message signed to log in to the rewards API.
pub const LOGIN_MESSAGE: &str = "pharos";

/// The single identity the bot acts for.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Chain ID for EIP-155 replay protection.
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for transaction signing
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;
        let signer = signer.with_chain_id(Some(chain_id));

        tracing::info!(
            address = %mask_address(&signer.address()),
            chain_id = chain_id,
            "Wallet initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign arbitrary message bytes (with Ethereum prefix).
    pub async fn sign_message(&self, message: &[u8]) -> BlockchainResult<Signature> {
        self.signer
            .sign_message(message)
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Message signing failed: {}", e)))
    }

    /// `0x`-prefixed hex signature over [`LOGIN_MESSAGE`].
    pub async fn login_signature(&self) -> BlockchainResult<String> {
        let signature = self.sign_message(LOGIN_MESSAGE.as_bytes()).await?;
        Ok(format!("0x{}", alloy::hex::encode(signature.as_bytes())))
    }

    /// Sign a fully populated request and return the raw EIP-2718 bytes.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = tx
            .with_from(self.address())
            .build(&wallet)
            .await
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;
        Ok(envelope.encoded_2718().into())
    }
}
