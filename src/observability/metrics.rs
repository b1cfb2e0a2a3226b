//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fetch_router_requests_total` (counter): requests by method, status, route
//! - `fetch_router_request_duration_seconds` (histogram): dispatch latency
//!
//! Routes are labelled by their registration pattern, `none` for unmatched
//! requests and `invalid` for requests whose URL could not be parsed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, route: &str, start_time: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    let route = route.to_string();

    metrics::counter!(
        "fetch_router_requests_total",
        "method" => method.clone(),
        "status" => status.clone(),
        "route" => route.clone()
    )
    .increment(1);
    metrics::histogram!(
        "fetch_router_request_duration_seconds",
        "method" => method,
        "status" => status,
        "route" => route
    )
    .record(start_time.elapsed().as_secs_f64());
}
