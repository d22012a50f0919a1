// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use crate::error::{ProxyError, Result};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, HistogramVec, Opts, Registry, TextEncoder, Encoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of inbound API requests
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of API requests"),
        &["method", "endpoint", "status_code"],
        REGISTRY
    ).expect("requests_total registers once");

    /// Request duration histogram
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["method", "endpoint"],
        REGISTRY
    ).expect("request_duration_seconds registers once");

    // ============================================================================
    // UPSTREAM METRICS
    // ============================================================================

    /// Upstream provider calls by outcome
    pub static ref UPSTREAM_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("upstream_calls_total", "Total upstream provider calls"),
        &["provider", "operation", "outcome"], // outcome: success, http_error, transport_error
        REGISTRY
    ).expect("upstream_calls_total registers once");

    /// Upstream call duration
    pub static ref UPSTREAM_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("upstream_duration_seconds", "Upstream provider call duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["provider", "operation"],
        REGISTRY
    ).expect("upstream_duration_seconds registers once");

    // ============================================================================
    // ERROR METRICS
    // ============================================================================

    /// Requests rejected or failed, by error kind
    pub static ref REQUEST_ERRORS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("request_errors_total", "Total failed requests by error kind"),
        &["endpoint", "kind"],
        REGISTRY
    ).expect("request_errors_total registers once");
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ProxyError::Internal(format!("Failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| ProxyError::Internal(format!("Metrics are not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Vec metrics only show up once a label set has been observed
        UPSTREAM_CALLS.with_label_values(&["huggingface", "chat", "success"]).inc();
        REQUESTS_TOTAL.with_label_values(&["POST", "/api/chat", "200"]).inc();
        let metrics = gather_metrics().unwrap();
        assert!(metrics.contains("upstream_calls_total"));
        assert!(metrics.contains("requests_total"));
    }
}
