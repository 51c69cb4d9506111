// openHAB REST API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining and response-to-ApiError
// mapping. Every method performs exactly one HTTP request; bounded retries
// are layered on top via `with_retry` so the caller picks the policy per
// endpoint (the listing and root document retry, per-item detail mostly
// doesn't).

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{RawItem, RootResponse};

/// Read-only client for the openHAB REST API.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    /// Build a client from a [`Transport`] config.
    pub fn new(transport: &Transport) -> Result<Self, ApiError> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(transport.base_url.clone()),
        })
    }

    /// Wrap a pre-built `reqwest::Client` (caller manages default headers).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// The server base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Typed endpoints ──────────────────────────────────────────────

    /// `GET {base}/rest` — the root/discovery document.
    pub async fn root(&self) -> Result<RootResponse, ApiError> {
        self.get_json("rest", &[]).await
    }

    /// `GET {base}/rest/items` — the full item listing.
    ///
    /// Requested with `metadata=.*` so every metadata namespace is embedded
    /// in the listing and per-item detail fetches are optional.
    pub async fn list_items(&self) -> Result<Vec<RawItem>, ApiError> {
        self.get_json("rest/items", &[("metadata", ".*"), ("recursive", "false")])
            .await
    }

    /// `GET {base}/rest/items/{name}` — per-item detail record.
    pub async fn item_detail(&self, name: &str) -> Result<RawItem, ApiError> {
        self.get_json(&format!("rest/items/{name}"), &[("metadata", ".*")])
            .await
    }

    // ── Request mechanics ────────────────────────────────────────────

    /// Issue a single GET against a path relative to the base URL and
    /// parse the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let resp = request.send().await?;
        handle_response(resp).await
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        // base_url always ends with `/`, so joining `rest/…` works.
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Auth {
            status: status.as_u16(),
        });
    }

    if !status.is_success() {
        let message = preview(&resp.text().await.unwrap_or_default()).to_owned();
        if status.is_server_error() {
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

fn preview(body: &str) -> &str {
    &body[..body.len().min(200)]
}

/// Ensure the base URL's path ends with `/` so that joining relative
/// paths (`rest/…`) appends rather than replacing the final segment.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let with_slash = format!("{}/", url.path());
        url.set_path(&with_slash);
    }
    url
}

// ── Retry ────────────────────────────────────────────────────────────

/// Run `op` up to `attempts` times, sleeping with exponential backoff
/// between transient failures.
///
/// Non-transient errors (auth rejection, malformed body, 4xx) are returned
/// immediately; only [`ApiError::is_transient`] failures are retried.
pub async fn with_retry<T>(
    attempts: u32,
    base_backoff: Duration,
    mut op: impl AsyncFnMut() -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let mut delay = base_backoff;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < attempts => {
                warn!(
                    attempt,
                    error = %err,
                    "transient API error, retrying in {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
            Err(err) => return Err(err),
        }
    }
}
