use thiserror::Error;

/// Top-level error type for the `habindex-api` crate.
///
/// Covers every failure mode of the read-only REST surface. `habindex-core`
/// decides which of these abort a crawl run and which are retried or
/// recorded per item.
#[derive(Debug, Error)]
pub enum ApiError {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Bearer token missing or rejected by the server (HTTP 401/403).
    #[error("Authentication rejected (HTTP {status})")]
    Auth { status: u16 },

    /// Token could not be encoded as an HTTP header value.
    #[error("Invalid API token: {message}")]
    InvalidToken { message: String },

    // ── Server ──────────────────────────────────────────────────────
    /// The server answered with a 5xx status.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status (4xx other than 401/403).
    #[error("Unexpected HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The response body is not valid JSON for the expected shape.
    /// Keeps the raw body for debugging.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String, body: String },
}

impl ApiError {
    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Connection failures, timeouts, and 5xx responses qualify; auth
    /// rejections and malformed bodies do not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Server { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the server rejected our credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::InvalidToken { .. })
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
