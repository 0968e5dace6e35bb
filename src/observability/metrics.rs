//! Metrics collection and exposition.
//!
//! # Metrics
//! - `broker_requests_total` (counter): requests by method and status
//! - `broker_request_duration_seconds` (histogram): latency by method
//! - `broker_config_loads_total` (counter): definition accesses by outcome
//!   (`cached`, `reloaded`, `read_error`, `parse_error`)
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "broker_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("broker_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record an access to the broker definition.
pub fn record_config_load(outcome: &'static str) {
    metrics::counter!("broker_config_loads_total", "outcome" => outcome).increment(1);
}
