use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{metrics, policy};

pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors surfaced by the request relay.
///
/// Client input errors never touch the network; upstream errors carry the
/// target URL so the caller can see what was being fetched.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("missing `url` query parameter")]
    MissingUrl,

    #[error("invalid target URL: {0}")]
    InvalidUrl(String),

    #[error("upstream fetch failed for {target}: {source}")]
    UpstreamFetch {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read upstream body for {target}: {source}")]
    UpstreamBody {
        target: String,
        #[source]
        source: reqwest::Error,
    },
}

const USAGE: &str = "GET /proxy?url=<absolute-url>";
const EXAMPLE: &str = "/proxy?url=https%3A%2F%2Fcdn.example.com%2Flive%2Findex.m3u8";

impl RelayError {
    /// Machine-readable error code for the JSON body.
    fn code(&self) -> &'static str {
        match self {
            RelayError::MissingUrl => "missing_url",
            RelayError::InvalidUrl(_) => "invalid_url",
            RelayError::UpstreamFetch { .. } => "upstream_fetch_failed",
            RelayError::UpstreamBody { .. } => "upstream_body_failed",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            RelayError::MissingUrl | RelayError::InvalidUrl(_) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": self.code(),
                    "usage": USAGE,
                    "example": EXAMPLE,
                }),
            ),
            RelayError::UpstreamFetch { target, source }
            | RelayError::UpstreamBody { target, source } => {
                metrics::record_upstream_error();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": self.code(),
                        "message": source.to_string(),
                        "target": target,
                    }),
                )
            }
        };

        error!("Request failed: {}", self);
        metrics::record_request("proxy", status.as_u16());

        // Error bodies carry the same CORS set as successes so browser
        // callers can read them.
        let mut response = (status, Json(body)).into_response();
        policy::apply_cors(response.headers_mut());
        response
    }
}
