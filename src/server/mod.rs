pub mod handlers;
pub mod state;

use crate::{config::Config, metrics};
use axum::{
    Router,
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use state::AppState;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Build the full application router.
///
/// Separated from [`start`] so tests can drive the router without binding a
/// TCP listener.
pub async fn build_router(config: Config) -> Router {
    handlers::health::mark_started();

    let state = AppState::new(config);
    let prometheus = metrics::prometheus_handle();

    Router::new()
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/proxy",
            get(handlers::proxy::relay)
                .post(handlers::proxy::relay)
                .options(handlers::proxy::preflight),
        )
        .route("/metrics", get(move || async move { prometheus.render() }))
        .layer(middleware::from_fn(version_header))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Stamp every response with the crate version.
async fn version_header(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        "x-hlsrelay-version",
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );
    response
}

/// Start the Axum HTTP server
pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", config.port);

    let app = build_router(config).await;

    // Bind TCP listener
    let listener = match tokio::net::TcpListener::bind(addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    info!("🚀 Server listening on http://{}", addr);

    // Start serving
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
