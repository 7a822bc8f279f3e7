//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cheat_requests_total` (counter): requests by outcome
//! - `cheat_request_duration_seconds` (histogram): handler latency
//! - `cheat_rate_limited_total` (counter): denials by window
//! - `cheat_search_results` (histogram): records returned per search
//! - `cheat_proxy_requests_total` (counter): shell relays by status

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    counter!("cheat_requests_total", "outcome" => outcome, "status" => status.to_string())
        .increment(1);
    histogram!("cheat_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record a rate limit denial.
pub fn record_rate_limited(window: &'static str) {
    counter!("cheat_rate_limited_total", "window" => window).increment(1);
}

/// Record the size of a search result.
pub fn record_search(results: usize) {
    histogram!("cheat_search_results").record(results as f64);
}

/// Record a relayed shell request.
pub fn record_proxy(status: u16) {
    counter!("cheat_proxy_requests_total", "status" => status.to_string()).increment(1);
}
