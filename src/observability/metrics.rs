//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): relayed calls by operation, status
//! - `gateway_request_duration_seconds` (histogram): latency by operation
//! - `gateway_upstream_errors_total` (counter): gateway-local failures by
//!   operation and kind
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("gateway_requests_total", "Gateway calls by operation and status");
    describe_histogram!(
        "gateway_request_duration_seconds",
        metrics::Unit::Seconds,
        "Gateway call latency including the backend round trip"
    );
    describe_counter!(
        "gateway_upstream_errors_total",
        "Gateway-local failures by operation and kind"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished gateway call.
pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record a transport or relay failure.
pub fn record_upstream_error(operation: &'static str, kind: &'static str) {
    counter!(
        "gateway_upstream_errors_total",
        "operation" => operation,
        "kind" => kind
    )
    .increment(1);
}
