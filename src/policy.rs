//! Static request/response header policy.
//!
//! Two constant tables live here: the per-domain origin/referer overrides
//! required by upstream access checks, and the permissive CORS set attached
//! to every response. Both are fixed at process start; nothing mutates them
//! at runtime.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};

/// Origin/referer override applied when `pattern` is contained in the
/// target hostname.
#[derive(Debug, Clone, Copy)]
pub struct DomainRule {
    pub pattern: &'static str,
    pub origin: &'static str,
    pub referer: &'static str,
}

/// Ordered rule table — the first substring match wins.
///
/// Adding a host is a one-line change here; no other component is involved.
pub const DOMAIN_RULES: &[DomainRule] = &[
    DomainRule {
        pattern: "krussdomi.com",
        origin: "https://hls.krussdomi.com",
        referer: "https://hls.krussdomi.com/",
    },
    DomainRule {
        pattern: "poocloud.in",
        origin: "https://ppvs.su",
        referer: "https://modistreams.org/",
    },
    DomainRule {
        pattern: "vodvidl.site",
        origin: "https://vidlink.pro",
        referer: "https://vidlink.pro/",
    },
];

/// Browser user-agent presented to every upstream host. Inbound client
/// headers are never forwarded.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Permissive CORS set carried by every response, success or error.
pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type, Range, Authorization"),
    ("access-control-expose-headers", "Content-Length, Content-Range"),
];

/// Resolve the extra request headers required for `hostname`.
///
/// Scans [`DOMAIN_RULES`] in table order and returns the origin/referer pair
/// of the first rule whose pattern is contained in the hostname. Unknown
/// hosts get an empty map; this never fails.
pub fn resolve_headers(hostname: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(rule) = DOMAIN_RULES.iter().find(|r| hostname.contains(r.pattern)) {
        headers.insert(header::ORIGIN, HeaderValue::from_static(rule.origin));
        headers.insert(header::REFERER, HeaderValue::from_static(rule.referer));
    }

    headers
}

/// Fixed header set sent with every upstream request, applied before the
/// domain-specific overrides.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static(DEFAULT_USER_AGENT),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers
}

/// Attach the permissive CORS set to a response header map.
pub fn apply_cors(headers: &mut HeaderMap) {
    for &(name, value) in CORS_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
}
