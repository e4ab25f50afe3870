//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_registrations_total` (counter): submissions by outcome
//! - `relay_rpc_errors_total` (counter): failed chain RPC calls by method
//! - `relay_activity_log_writes_total` (counter): activity log appends by log and outcome
//! - `relay_backend_health` (gauge): 1=healthy, 0=unhealthy
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - The Prometheus endpoint is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the final outcome of a registration submission.
pub fn record_registration(outcome: &'static str) {
    metrics::counter!("relay_registrations_total", "outcome" => outcome).increment(1);
}

/// Record a failed chain RPC call.
pub fn record_rpc_error(method: &'static str) {
    metrics::counter!("relay_rpc_errors_total", "method" => method).increment(1);
}

/// Record an activity log append.
pub fn record_log_write(log: &str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!("relay_activity_log_writes_total", "log" => log.to_string(), "outcome" => outcome)
        .increment(1);
}

/// Record health of an upstream dependency.
pub fn record_backend_health(backend: &'static str, healthy: bool) {
    metrics::gauge!("relay_backend_health", "backend" => backend).set(if healthy { 1.0 } else { 0.0 });
}
