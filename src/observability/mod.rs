//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator steps produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Terminal (pretty) or log aggregation (JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging; addresses masked, keys and tokens never logged
//! - Metrics are cheap (atomic increments) and recorded even without an exporter

pub mod logging;
pub mod metrics;
