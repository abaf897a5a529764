//! Pharos testnet rewards bot library

pub mod api;
pub mod blockchain;
pub mod cli;
pub mod config;
pub mod observability;
pub mod orchestrator;

pub use config::schema::BotConfig;
pub use orchestrator::Orchestrator;
