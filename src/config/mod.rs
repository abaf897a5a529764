//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BotConfig (validated, immutable)
//!     → handed to the orchestrator at startup
//!
//! private key
//!     → PHAROS_PRIVATE_KEY env var, or interactive prompt
//!     → never part of the config file
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AmountRangeConfig, ApiConfig, BlockchainConfig, BotConfig, LogFormat, ObservabilityConfig,
    TaskConfig,
};
