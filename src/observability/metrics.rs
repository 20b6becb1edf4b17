//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lb_updater_reconciliations_total` (counter): requests by outcome
//! - `lb_updater_reconcile_duration_seconds` (histogram): fetch → submit latency
//! - `lb_updater_rules_dropped_total` (counter): port rules pruned by the sanitizer
//! - `lb_updater_control_plane_requests_total` (counter): API calls by operation, status
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished reconciliation request.
pub fn record_reconciliation(outcome: &'static str, start: Instant) {
    counter!("lb_updater_reconciliations_total", "outcome" => outcome).increment(1);
    histogram!("lb_updater_reconcile_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_dropped_rules(count: usize) {
    if count > 0 {
        counter!("lb_updater_rules_dropped_total").increment(count as u64);
    }
}

pub fn record_control_plane_call(operation: &'static str, status: u16) {
    counter!(
        "lb_updater_control_plane_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
}
