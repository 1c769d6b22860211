//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mint_client_actions_total` (counter): actions by `action`, `outcome`
//! - `mint_client_rpc_errors_total` (counter): failed RPC calls by `op`
//! - `mint_client_phase` (gauge): last observed phase ordinal
//! - `mint_client_block_height` (gauge): last observed chain height
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::game::types::{GamePhase, MintAction};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_action(action: MintAction, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!(
        "mint_client_actions_total",
        "action" => action.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_rpc_error(op: &'static str) {
    ::metrics::counter!("mint_client_rpc_errors_total", "op" => op).increment(1);
}

pub fn record_phase(phase: GamePhase) {
    ::metrics::gauge!("mint_client_phase").set(phase.ordinal() as f64);
}

pub fn record_block_height(height: u64) {
    ::metrics::gauge!("mint_client_block_height").set(height as f64);
}
