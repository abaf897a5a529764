//! Orchestrator error taxonomy.
//!
//! Only [`AuthError`] ends a run. [`ActionError`] is logged at the call site
//! and the interactive loop carries on.

use alloy::primitives::U256;
use thiserror::Error;

use crate::api::ApiError;
use crate::blockchain::BlockchainError;

/// Login could not be completed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("could not sign login message: {0}")]
    Signing(#[source] BlockchainError),

    #[error("login rejected: {0}")]
    Rejected(#[source] ApiError),
}

/// A single reward or on-chain action failed.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The amount exceeds available funds; nothing was submitted.
    #[error("insufficient balance: need {required} wei, have {available} wei")]
    InsufficientBalance { required: U256, available: U256 },

    #[error(transparent)]
    Chain(#[from] BlockchainError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_balance_display() {
        let err = ActionError::InsufficientBalance {
            required: U256::from(10u64),
            available: U256::from(3u64),
        };
        assert_eq!(err.to_string(), "insufficient balance: need 10 wei, have 3 wei");
    }

    #[test]
    fn test_chain_error_is_transparent() {
        let err = ActionError::from(BlockchainError::Timeout(10));
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");
    }
}
