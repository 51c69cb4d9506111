// Shared transport configuration for building reqwest::Client instances.
//
// The crawler issues every request through one client built here, so the
// bearer token and timeout are injected once as client defaults instead of
// being threaded through each call site.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::ApiError;

/// Default request timeout. Bounds the duration of a single REST call;
/// the overall crawl is bounded by the external scheduler.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct Transport {
    /// Server base URL (e.g. `http://openhab:8080`).
    pub base_url: Url,
    /// Optional bearer token for authenticated servers.
    pub token: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Transport {
    /// Create a transport config with no token and the default timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` from this config.
    ///
    /// Sends `Accept: application/json` on every request and injects
    /// `Authorization: Bearer <token>` as a default header when a token
    /// is configured.
    pub fn build_client(&self) -> Result<reqwest::Client, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(ref token) = self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::InvalidToken {
                    message: e.to_string(),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("habindex/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::ClientBuild {
                message: e.to_string(),
            })
    }
}
