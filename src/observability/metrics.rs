//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mint_attempts_total` (counter): mint transactions by outcome
//! - `mint_events_total` (counter): mint events observed on-chain
//! - `mint_minted_count` (gauge): last read of the contract counter
//! - `mint_rpc_health` (gauge): 1=reachable, 0=unreachable
//!
//! # Design Decisions
//! - Exporter is optional; without it every update is a no-op
//! - Labels kept to a single low-cardinality `outcome`

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record the outcome of a mint attempt (`"success"`, `"reverted"`, `"error"`).
pub fn record_mint_attempt(outcome: &'static str) {
    counter!("mint_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_mint_event() {
    counter!("mint_events_total").increment(1);
}

pub fn record_minted_count(count: u64) {
    gauge!("mint_minted_count").set(count as f64);
}

pub fn record_rpc_health(healthy: bool) {
    gauge!("mint_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}
