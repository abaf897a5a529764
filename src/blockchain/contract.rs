//! Wrapped native token (WPHRS) ABI.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

sol! {
    /// WETH9-style wrapper around the native currency.
    #[derive(Debug)]
    interface IWrappedToken {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
        function deposit() external payable;
        function withdraw(uint256 wad) external;
    }
}

/// Calldata for `deposit()`; the amount travels as transaction value.
pub fn deposit_calldata() -> Bytes {
    IWrappedToken::depositCall {}.abi_encode().into()
}

/// Calldata for `withdraw(wad)`; the amount is an argument, not value.
pub fn withdraw_calldata(wad: U256) -> Bytes {
    IWrappedToken::withdrawCall { wad }.abi_encode().into()
}

pub fn balance_of_calldata(owner: Address) -> Bytes {
    IWrappedToken::balanceOfCall { owner }.abi_encode().into()
}

pub fn decimals_calldata() -> Bytes {
    IWrappedToken::decimalsCall {}.abi_encode().into()
}

pub fn decode_balance_of(data: &[u8]) -> BlockchainResult<U256> {
    IWrappedToken::balanceOfCall::abi_decode_returns(data)
        .map_err(|e| BlockchainError::Decode(format!("balanceOf: {}", e)))
}

pub fn decode_decimals(data: &[u8]) -> BlockchainResult<u8> {
    IWrappedToken::decimalsCall::abi_decode_returns(data)
        .map_err(|e| BlockchainError::Decode(format!("decimals: {}", e)))
}
