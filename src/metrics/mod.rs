// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    UPSTREAM_CALLS,
    UPSTREAM_DURATION,
    REQUEST_ERRORS,
};

/// Helper to record request metrics
pub fn record_request(method: &str, endpoint: &str, status_code: u16, duration_secs: f64) {
    REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status_code.to_string()])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[method, endpoint])
        .observe(duration_secs);
}

/// Helper to record upstream call metrics
pub fn record_upstream_call(provider: &str, operation: &str, outcome: &str, duration_secs: f64) {
    UPSTREAM_CALLS
        .with_label_values(&[provider, operation, outcome])
        .inc();

    UPSTREAM_DURATION
        .with_label_values(&[provider, operation])
        .observe(duration_secs);
}

/// Helper to record a failed request by error kind
pub fn record_error(endpoint: &str, kind: &str) {
    REQUEST_ERRORS.with_label_values(&[endpoint, kind]).inc();
}
