use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Operation result metrics
    pub static ref OP_RESPONSES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "opres_responses_total",
        "Operation results written to clients",
        &["code", "status"]
    )
    .unwrap();

    pub static ref OP_FALLBACKS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "opres_fallbacks_total",
        "Responses replaced by the fallback code",
        &["reason"]  // reason: opaque_error, unknown_code, serialization
    )
    .unwrap();
}

/// Initialize all metrics (called on startup)
pub fn init_metrics() {
    // Force lazy_static initialization
    lazy_static::initialize(&HTTP_REQUESTS_TOTAL);
    lazy_static::initialize(&HTTP_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&OP_RESPONSES_TOTAL);
    lazy_static::initialize(&OP_FALLBACKS_TOTAL);
}
