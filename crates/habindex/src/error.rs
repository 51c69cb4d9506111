//! CLI error types with miette diagnostics.
//!
//! Maps `CrawlError` variants into user-facing errors with actionable help
//! text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use habindex_api::ApiError;
use habindex_core::CrawlError;

/// Process exit codes. Non-zero only for whole-run failures.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("No openHAB server configured")]
    #[diagnostic(
        code(habindex::no_base_url),
        help(
            "Set OPENHAB_BASE_URL, pass --base-url, or add a profile to the\n\
             config file at: {path}"
        )
    )]
    NoBaseUrl { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(habindex::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(habindex::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(habindex::config))]
    Config(Box<figment::Error>),

    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the openHAB server")]
    #[diagnostic(
        code(habindex::connection_failed),
        help(
            "Check that the server is running and OPENHAB_BASE_URL points at\n\
             its REST API (e.g. http://openhab:8080)."
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(habindex::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("The openHAB server rejected the API token")]
    #[diagnostic(
        code(habindex::auth_failed),
        help(
            "Create an API token in openHAB (profile page -> API tokens) and\n\
             set OPENHAB_API_TOKEN."
        )
    )]
    AuthFailed,

    // ── Crawl / artifacts ────────────────────────────────────────────

    #[error("Crawl failed: {message}")]
    #[diagnostic(code(habindex::crawl_failed))]
    CrawlFailed { message: String },

    #[error("No index found at {path}")]
    #[diagnostic(
        code(habindex::no_index),
        help("Run: habindex crawl to produce one.")
    )]
    NoIndex { path: String },

    #[error("Item '{name}' not found in the index")]
    #[diagnostic(
        code(habindex::item_not_found),
        help("Run: habindex show to list what the index contains.")
    )]
    ItemNotFound { name: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(habindex::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed => exit_code::AUTH,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NoBaseUrl { .. } | Self::Validation { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CrawlError → CliError mapping ────────────────────────────────────

impl From<CrawlError> for CliError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Api(api) => {
                if api.is_auth() {
                    return Self::AuthFailed;
                }
                if api.is_timeout() {
                    return Self::Timeout;
                }
                match api {
                    ApiError::Transport(e) => Self::ConnectionFailed { source: e.into() },
                    other => Self::CrawlFailed {
                        message: other.to_string(),
                    },
                }
            }

            CrawlError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },

            other => Self::CrawlFailed {
                message: other.to_string(),
            },
        }
    }
}
