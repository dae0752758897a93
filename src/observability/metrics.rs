//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method and status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_store_connect_attempts_total` (counter): cold-start connects
//! - `gateway_store_connected` (gauge): 1=connected, 0=disconnected

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Record one backing-store connect attempt.
pub fn record_store_connect_attempt() {
    metrics::counter!("gateway_store_connect_attempts_total").increment(1);
}

/// Record the current connected/disconnected state.
pub fn record_store_connected(connected: bool) {
    metrics::gauge!("gateway_store_connected").set(if connected { 1.0 } else { 0.0 });
}
