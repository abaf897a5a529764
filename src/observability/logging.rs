//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config or `RUST_LOG`
//! - Shorten addresses and hashes for display
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for unattended runs, pretty format for the terminal

use alloy::primitives::{Address, TxHash};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pharos_bot={},warn", config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}

/// `0x1234...abcd` form of an address.
pub fn mask_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// First ten characters of a transaction hash, e.g. `0x12345678...`.
pub fn short_hash(hash: &TxHash) -> String {
    let full = hash.to_string();
    format!("{}...", &full[..10])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_mask_address() {
        let addr = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
        assert_eq!(mask_address(&addr), "0xf39F...2266");
    }

    #[test]
    fn test_short_hash() {
        let hash = TxHash::repeat_byte(0xab);
        assert_eq!(short_hash(&hash), "0xabababab...");
    }
}
