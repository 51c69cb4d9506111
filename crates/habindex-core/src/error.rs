use std::path::PathBuf;

use thiserror::Error;

use habindex_api::ApiError;

/// Whole-run failures.
///
/// Only three things abort a crawl: the listing or root document failing
/// with a transport-class error after retries, invalid configuration, and
/// not being able to write the output artifacts. Everything item-scoped is
/// accumulated as an [`ItemIssue`] instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Listing/root request failed after exhausting retries.
    #[error("REST API request failed: {0}")]
    Api(#[from] ApiError),

    /// Output artifact could not be written; any previous artifact at the
    /// destination is left untouched.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact (de)serialization failed.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid crawler configuration.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

/// Per-item problems accumulated into the run summary. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemIssue {
    /// A raw record was dropped (missing/empty `name`).
    InvalidItem { reason: String },
    /// Per-item detail fetch failed; the listing record is kept.
    DetailFetch { name: String, message: String },
    /// Membership-graph anomaly (cycle, unresolvable role, orphan branch).
    Structural { message: String },
}

impl std::fmt::Display for ItemIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidItem { reason } => write!(f, "invalid item: {reason}"),
            Self::DetailFetch { name, message } => {
                write!(f, "detail fetch for '{name}' failed: {message}")
            }
            Self::Structural { message } => write!(f, "structural warning: {message}"),
        }
    }
}
