//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pharos_api_requests_total` (counter): rewards API calls by endpoint, outcome
//! - `pharos_transactions_total` (counter): on-chain actions by kind, outcome
//! - `pharos_points` (gauge): last fetched point total
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Exporter is optional; recording is a no-op without one

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "failure"
    }
}

/// Record one rewards API call.
pub fn record_api_call(endpoint: &'static str, ok: bool) {
    metrics::counter!(
        "pharos_api_requests_total",
        "endpoint" => endpoint,
        "outcome" => outcome(ok)
    )
    .increment(1);
}

/// Record one on-chain action (`transfer`, `wrap`, `unwrap`).
pub fn record_transaction(kind: &'static str, ok: bool) {
    metrics::counter!(
        "pharos_transactions_total",
        "kind" => kind,
        "outcome" => outcome(ok)
    )
    .increment(1);
}

pub fn record_points(points: u64) {
    metrics::gauge!("pharos_points").set(points as f64);
}
