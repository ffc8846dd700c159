use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static REGISTRATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "registry_registrations_total",
        "Total registrations counted via the public API"
    )
    .expect("register registrations_total")
});

pub static ADMIN_ADJUSTMENTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "registry_admin_adjustments_total",
        "Total manual counter adjustments applied"
    )
    .expect("register admin_adjustments_total")
});

pub static KEEPALIVE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "registry_keepalive_failures_total",
        "Total failed keep-alive probes"
    )
    .expect("register keepalive_failures_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

/// `GET /metrics` handler.
pub async fn metrics() -> (axum::http::StatusCode, String) {
    encode_metrics()
}
