//! Rewards API subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator
//!     → client.rs (HTTP request with address + bearer token)
//!     → types.rs (envelope {code, msg, data} → typed payload or ApiError)
//!     → session.rs (token + points carried between calls)
//! ```

pub mod client;
pub mod session;
pub mod types;

pub use client::RewardsApi;
pub use session::Session;
pub use types::{ApiError, Envelope, FaucetStatusData};
