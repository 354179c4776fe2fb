use crate::{
    error::{RelayError, Result},
    hls::{classify, rewriter},
    metrics, policy,
    server::state::AppState,
};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

/// Answer CORS preflight with the permissive header set and no body.
///
/// Short-circuits before any validation so preflights never touch the
/// network.
pub async fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    policy::apply_cors(response.headers_mut());
    response
}

/// Relay one proxied exchange.
///
/// Validates the `url` query parameter, merges request headers (defaults,
/// per-domain overrides, forwarded `Range`), fetches the target with a
/// bounded timeout, then either rewrites a playlist body or forwards the raw
/// upstream response.
pub async fn relay(
    method: Method,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    let start = Instant::now();

    let raw = params.get("url").ok_or(RelayError::MissingUrl)?;
    let target = Url::parse(raw).map_err(|_| RelayError::InvalidUrl(raw.clone()))?;

    info!("Relaying {} {}", method, target);

    let upstream = fetch_upstream(&state, method, &target, &headers).await?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let response = if classify::is_playlist(&target, content_type.as_deref()) {
        serve_playlist(&state, upstream, &target, &headers).await?
    } else {
        forward_binary(upstream)
    };

    metrics::record_request("proxy", response.status().as_u16());
    metrics::record_duration("proxy", start);

    Ok(response)
}

/// Issue the upstream request with merged headers and a bounded timeout.
///
/// Header priority, lowest to highest: fixed defaults, per-domain
/// origin/referer overrides, the caller's `Range` header. All other inbound
/// headers are dropped.
async fn fetch_upstream(
    state: &AppState,
    method: Method,
    target: &Url,
    inbound: &HeaderMap,
) -> Result<reqwest::Response> {
    let mut upstream_headers = policy::default_headers();

    let hostname = target.host_str().unwrap_or_default();
    upstream_headers.extend(policy::resolve_headers(hostname));

    // Forward Range verbatim so seeking/partial content keeps working
    if let Some(range) = inbound.get(header::RANGE) {
        upstream_headers.insert(header::RANGE, range.clone());
    }

    state
        .http_client
        .request(method, target.clone())
        .headers(upstream_headers)
        .timeout(Duration::from_secs(state.config.upstream_timeout_secs))
        .send()
        .await
        .map_err(|source| RelayError::UpstreamFetch {
            target: target.to_string(),
            source,
        })
}

/// Buffer the playlist body, rewrite its references through the proxy, and
/// respond with the playlist media type and a short public cache lifetime.
async fn serve_playlist(
    state: &AppState,
    upstream: reqwest::Response,
    target: &Url,
    inbound: &HeaderMap,
) -> Result<Response> {
    let target_str = target.to_string();

    let body = upstream
        .text()
        .await
        .map_err(|source| RelayError::UpstreamBody {
            target: target_str.clone(),
            source,
        })?;

    let proxy_base = proxy_base(state, inbound);
    let rewritten = rewriter::rewrite_playlist(&body, &proxy_base, &target_str);

    debug!(
        "Rewrote playlist from {} ({} -> {} bytes)",
        target_str,
        body.len(),
        rewritten.len()
    );

    let cache_control = format!("public, max-age={}", state.config.playlist_max_age_secs);

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/vnd.apple.mpegurl"),
            (header::CACHE_CONTROL, cache_control.as_str()),
        ],
        rewritten,
    )
        .into_response();
    policy::apply_cors(response.headers_mut());

    Ok(response)
}

/// Forward an opaque upstream response: selected headers, the exact status
/// code (206 included), and the body streamed through without buffering.
fn forward_binary(upstream: reqwest::Response) -> Response {
    let forwarded = [
        header::CONTENT_TYPE,
        header::CONTENT_LENGTH,
        header::CONTENT_RANGE,
        header::ACCEPT_RANGES,
    ];

    let status = upstream.status();

    let mut headers = HeaderMap::new();
    for name in forwarded {
        if let Some(value) = upstream.headers().get(&name) {
            headers.insert(name, value.clone());
        }
    }
    policy::apply_cors(&mut headers);

    let body = Body::from_stream(upstream.bytes_stream());

    (status, headers, body).into_response()
}

/// The externally visible URL of this proxy endpoint, used as the rewrite
/// prefix. Taken from config when set, otherwise derived from the inbound
/// request's own host.
fn proxy_base(state: &AppState, inbound: &HeaderMap) -> String {
    match &state.config.public_base_url {
        Some(base) => format!("{}/proxy", base.trim_end_matches('/')),
        None => {
            let scheme = inbound
                .get("x-forwarded-proto")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("http");
            let host = inbound
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("localhost");
            format!("{scheme}://{host}/proxy")
        }
    }
}
