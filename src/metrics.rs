//! Prometheus metrics helpers.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder and return a handle for rendering.
///
/// The first call installs the global recorder; later calls reuse it, so
/// tests can build any number of routers.
pub fn prometheus_handle() -> PrometheusHandle {
    RECORDER
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .expect("Failed to install Prometheus recorder")
        })
        .clone()
}

/// Count a handled request by endpoint and response status.
pub fn record_request(endpoint: &'static str, status: u16) {
    counter!(
        "hlsrelay_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record wall-clock handling time for an endpoint.
pub fn record_duration(endpoint: &'static str, start: Instant) {
    histogram!("hlsrelay_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Count an upstream fetch or body-read failure.
pub fn record_upstream_error() {
    counter!("hlsrelay_upstream_errors_total").increment(1);
}
