use std::env;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Externally visible base URL used as the prefix for rewritten playlist
    /// references. When `None`, the proxy base is derived per request from
    /// the inbound `Host` header and `X-Forwarded-Proto`.
    pub public_base_url: Option<String>,
    pub is_dev: bool,
    /// Upper bound on the upstream fetch, in seconds
    pub upstream_timeout_secs: u64,
    /// Client-visible cache lifetime for rewritten playlists, in seconds
    pub playlist_max_age_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    /// In DEV mode, provides sensible defaults. In PROD mode, PORT is required.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Check if running in dev mode
        let is_dev = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        // Port: required in prod, defaults to 3000 in dev
        let port = if is_dev {
            env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?
        } else {
            env::var("PORT")
                .map_err(|_| "PORT is required in production")?
                .parse()?
        };

        // Public base URL: optional in both modes; the relay falls back to
        // the inbound Host header when it is absent
        let public_base_url = env::var("PUBLIC_BASE_URL").ok();

        // Upstream fetch timeout: defaults to 25 seconds, sized to fit
        // within typical serverless/edge execution limits
        let upstream_timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "25".to_string())
            .parse()
            .unwrap_or(25);

        // Playlist cache lifetime: defaults to 5 minutes
        let playlist_max_age_secs = env::var("PLAYLIST_MAX_AGE_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .unwrap_or(300);

        Ok(Config {
            port,
            public_base_url,
            is_dev,
            upstream_timeout_secs,
            playlist_max_age_secs,
        })
    }
}
