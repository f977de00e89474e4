//! Metrics collection and exposition.
//!
//! # Metrics
//! - `haiku_cache_lookups_total` (counter): by outcome (hit, miss, corrupt)
//! - `haiku_pipeline_results_total` (counter): by outcome (cache_hit, ok, degraded)
//! - `haiku_remote_requests_total` (counter): by endpoint and outcome
//! - `haiku_remote_request_duration_seconds` (histogram): by endpoint
//! - `haiku_detected_total` (counter): haikus found in fresh fetches
//! - `haiku_cache_entries` (gauge): entries held by the in-memory store
//!
//! Recording is a no-op until a recorder is installed by `init_metrics`.

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

pub fn record_cache_lookup(outcome: &'static str) {
    ::metrics::counter!("haiku_cache_lookups_total", "outcome" => outcome).increment(1);
}

pub fn record_pipeline_result(outcome: &'static str) {
    ::metrics::counter!("haiku_pipeline_results_total", "outcome" => outcome).increment(1);
}

pub fn record_remote_request(endpoint: &'static str, outcome: &'static str, start: Instant) {
    ::metrics::counter!(
        "haiku_remote_requests_total",
        "endpoint" => endpoint,
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!("haiku_remote_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_haikus_detected(count: usize) {
    ::metrics::counter!("haiku_detected_total").increment(count as u64);
}

pub fn record_cache_size(size: usize) {
    ::metrics::gauge!("haiku_cache_entries").set(size as f64);
}
