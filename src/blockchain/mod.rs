//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Private key (env var or prompt)
//!     → wallet.rs (key loading, message + transaction signing)
//!     → client.rs (RPC connection with timeouts, ChainRpc seam)
//!     → gas.rs (EIP-1559 fees, legacy fallback)
//!     → transaction.rs (build, sign, broadcast, confirm)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Receipt waits are bounded

pub mod client;
pub mod contract;
pub mod gas;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{BlockchainClient, ChainRpc};
pub use gas::FeeParams;
pub use transaction::{TxBuilder, TxSettings};
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId, MinedReceipt};
pub use wallet::Wallet;
