//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): proxied requests by status and outcome
//! - `proxy_request_duration_seconds` (histogram): end-to-end proxy latency
//! - `gzip_sniff_total` (counter): sniff outcomes (gzip, plain, unreadable)
//!
//! With no recorder installed every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_proxy_request(status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_gzip_sniff(result: &'static str) {
    metrics::counter!("gzip_sniff_total", "result" => result).increment(1);
}
