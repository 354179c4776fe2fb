use axum::{Json, response::IntoResponse};
use serde_json::json;
use std::sync::OnceLock;
use std::time::Instant;

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

/// Record process start; the first call wins.
pub fn mark_started() {
    STARTED_AT.get_or_init(Instant::now);
}

/// Liveness endpoint with version and uptime
pub async fn health_check() -> impl IntoResponse {
    let uptime_seconds = STARTED_AT
        .get()
        .map(|started| started.elapsed().as_secs())
        .unwrap_or(0);

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": uptime_seconds,
    }))
}
