//! Crawler configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CrawlError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
/// Default bounded concurrency for per-item detail fetches.
pub const DEFAULT_CONCURRENCY: usize = 6;
/// Upper bound on detail-fetch concurrency.
pub const MAX_CONCURRENCY: usize = 16;

/// Configuration for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Base URL of the openHAB server (e.g. `http://openhab:8080`).
    pub base_url: Url,
    /// Optional bearer token.
    pub token: Option<SecretString>,
    /// Directory the artifacts (`index.json`, `rest_root.json`) are
    /// written into. Created if missing.
    pub data_dir: PathBuf,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Concurrent per-item detail fetches (1..=16).
    pub concurrency: usize,
    /// Fetch per-item detail records after the listing. Off by default —
    /// the listing already embeds metadata namespaces.
    pub fetch_details: bool,
}

impl CrawlerConfig {
    /// Config with defaults for everything but the base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            data_dir: PathBuf::from("data"),
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            fetch_details: false,
        }
    }

    /// Validate ranges that clap/figment can't enforce on their own.
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(CrawlError::Config {
                message: format!(
                    "concurrency must be between 1 and {MAX_CONCURRENCY}, got {}",
                    self.concurrency
                ),
            });
        }
        if self.timeout.is_zero() {
            return Err(CrawlError::Config {
                message: "timeout must be non-zero".into(),
            });
        }
        Ok(())
    }

    /// Path of the item index artifact.
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join("index.json")
    }

    /// Path of the root-info artifact.
    pub fn root_info_path(&self) -> PathBuf {
        self.data_dir.join("rest_root.json")
    }
}
