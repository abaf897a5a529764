//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, amount ranges ordered)
//! - Check that URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BotConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use std::fmt;

use crate::config::schema::{AmountRangeConfig, BotConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.api.base_url).is_err() {
        errors.push(ValidationError::new("api.base_url", "not a valid URL"));
    }
    if config.api.request_timeout_secs == 0 {
        errors.push(ValidationError::new("api.request_timeout_secs", "must be > 0"));
    }

    let chain = &config.blockchain;
    if url::Url::parse(&chain.rpc_url).is_err() {
        errors.push(ValidationError::new("blockchain.rpc_url", "not a valid URL"));
    }
    if chain.chain_id == 0 {
        errors.push(ValidationError::new("blockchain.chain_id", "must be > 0"));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.confirmation_timeout_secs",
            "must be > 0",
        ));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("blockchain.poll_interval_ms", "must be > 0"));
    }
    if chain.wrapped_token.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "blockchain.wrapped_token",
            "not a valid address",
        ));
    }

    check_range("tasks.transfer_amount", &config.tasks.transfer_amount, &mut errors);
    check_range("tasks.swap_amount", &config.tasks.swap_amount, &mut errors);

    if config.tasks.transfer_gas_limit < 21_000 {
        errors.push(ValidationError::new(
            "tasks.transfer_gas_limit",
            "must be at least 21000",
        ));
    }
    if config.tasks.contract_gas_limit == 0 {
        errors.push(ValidationError::new("tasks.contract_gas_limit", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a valid socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_range(field: &str, range: &AmountRangeConfig, errors: &mut Vec<ValidationError>) {
    // Amounts are drawn with micro-unit precision.
    if !(range.min >= 0.000_001) {
        errors.push(ValidationError::new(field, "min must be at least 0.000001"));
    }
    if !(range.max >= range.min) {
        errors.push(ValidationError::new(field, "max must be >= min"));
    }
}
