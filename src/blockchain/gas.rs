//! Fee parameter selection.
//!
//! Prefers EIP-1559 fees (latest base fee + priority fee). Nodes that expose
//! neither field get a single legacy gas price instead of an error.

use alloy::network::TransactionBuilder;
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::client::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Fee fields for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeParams {
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
    Legacy {
        gas_price: u128,
    },
}

impl FeeParams {
    /// The most a unit of gas can cost under these parameters.
    pub fn max_price_per_gas(&self) -> u128 {
        match self {
            FeeParams::Eip1559 { max_fee_per_gas, .. } => *max_fee_per_gas,
            FeeParams::Legacy { gas_price } => *gas_price,
        }
    }

    /// Set the fee fields on a transaction request.
    pub fn apply(&self, tx: TransactionRequest) -> TransactionRequest {
        match *self {
            FeeParams::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => tx
                .with_max_fee_per_gas(max_fee_per_gas)
                .with_max_priority_fee_per_gas(max_priority_fee_per_gas),
            FeeParams::Legacy { gas_price } => tx.with_gas_price(gas_price),
        }
    }

    /// Refuse prices above `max_gwei`.
    pub fn check_cap(&self, max_gwei: u64) -> BlockchainResult<()> {
        let price = self.max_price_per_gas();
        if price > max_gwei as u128 * WEI_PER_GWEI {
            let current_gwei = price.div_ceil(WEI_PER_GWEI);
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: current_gwei.min(u64::MAX as u128) as u64,
                max_gwei,
            });
        }
        Ok(())
    }
}

/// Resolve fee parameters, falling back to the legacy gas price when the
/// node has no base fee or no priority fee endpoint.
pub async fn resolve_fees<C: ChainRpc>(chain: &C) -> BlockchainResult<FeeParams> {
    match eip1559_fees(chain).await {
        Ok(Some(fees)) => return Ok(fees),
        Ok(None) => tracing::debug!("Latest block has no base fee, using legacy gas price"),
        Err(e) => tracing::debug!(error = %e, "Fee market query failed, using legacy gas price"),
    }

    let gas_price = chain.get_gas_price().await?;
    Ok(FeeParams::Legacy { gas_price })
}

async fn eip1559_fees<C: ChainRpc>(chain: &C) -> BlockchainResult<Option<FeeParams>> {
    let Some(base_fee) = chain.get_latest_base_fee().await? else {
        return Ok(None);
    };
    let priority = chain.get_max_priority_fee().await?;
    Ok(Some(FeeParams::Eip1559 {
        max_fee_per_gas: base_fee.saturating_add(priority),
        max_priority_fee_per_gas: priority,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap() {
        let fees = FeeParams::Legacy {
            gas_price: 600 * WEI_PER_GWEI,
        };
        assert!(matches!(
            fees.check_cap(500),
            Err(BlockchainError::GasPriceTooHigh {
                current_gwei: 600,
                max_gwei: 500
            })
        ));
        assert!(fees.check_cap(600).is_ok());
    }

    #[test]
    fn test_cap_counts_fractional_gwei() {
        let fees = FeeParams::Eip1559 {
            max_fee_per_gas: 500 * WEI_PER_GWEI + WEI_PER_GWEI * 9 / 10,
            max_priority_fee_per_gas: WEI_PER_GWEI,
        };
        assert!(matches!(
            fees.check_cap(500),
            Err(BlockchainError::GasPriceTooHigh {
                current_gwei: 501,
                max_gwei: 500
            })
        ));
        assert!(fees.check_cap(501).is_ok());

        let exact = FeeParams::Legacy {
            gas_price: 500 * WEI_PER_GWEI,
        };
        assert!(exact.check_cap(500).is_ok());
    }

    #[test]
    fn test_apply_sets_matching_fields() {
        let tx = FeeParams::Legacy { gas_price: 7 }.apply(TransactionRequest::default());
        assert_eq!(tx.gas_price, Some(7));
        assert_eq!(tx.max_fee_per_gas, None);

        let tx = FeeParams::Eip1559 {
            max_fee_per_gas: 10,
            max_priority_fee_per_gas: 2,
        }
        .apply(TransactionRequest::default());
        assert_eq!(tx.gas_price, None);
        assert_eq!(tx.max_fee_per_gas, Some(10));
        assert_eq!(tx.max_priority_fee_per_gas, Some(2));
    }
}
