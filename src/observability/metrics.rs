//! Metrics collection and exposition.
//!
//! # Metrics
//! - `provisioning_requests_total` (counter): requests by method, status
//! - `provisioning_request_duration_seconds` (histogram): latency distribution
//! - `provisioning_commands_total` (counter): subprocess runs by program, outcome
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - The exporter binds only when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "provisioning_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("provisioning_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

pub fn record_command(program: &str, outcome: &'static str) {
    ::metrics::counter!(
        "provisioning_commands_total",
        "program" => program.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
