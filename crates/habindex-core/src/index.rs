//! The persisted index artifact and its atomic writer.
//!
//! Artifacts are written to `<dest>.tmp` in the destination directory and
//! renamed into place, so readers never observe a partial file and a failed
//! run leaves the previous snapshot intact.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CrawlError;
use crate::model::{Item, RootInfo, SemanticTree};

/// The queryable snapshot: flat item map plus semantic tree.
///
/// Fully rebuilt on every crawl; `items_by_name` is sorted by item name so
/// key ordering is stable across runs with unchanged input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// When this snapshot was produced.
    pub generated_at: DateTime<Utc>,
    pub items_by_name: IndexMap<String, Item>,
    pub semantic_tree: SemanticTree,
}

impl Index {
    /// Build an index from normalized, classified items and their tree.
    pub fn new(items: Vec<Item>, semantic_tree: SemanticTree) -> Self {
        let mut items = items;
        items.sort_by(|a, b| a.name.cmp(&b.name));
        let items_by_name = items.into_iter().map(|i| (i.name.clone(), i)).collect();
        Self {
            generated_at: Utc::now(),
            items_by_name,
            semantic_tree,
        }
    }

    /// Atomically write this index as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<(), CrawlError> {
        write_json_atomic(path, self)
    }

    /// Load a previously written index.
    pub fn load(path: &Path) -> Result<Self, CrawlError> {
        load_json(path)
    }
}

impl RootInfo {
    /// Atomically write the root-info artifact.
    pub fn write(&self, path: &Path) -> Result<(), CrawlError> {
        write_json_atomic(path, self)
    }

    /// Load a previously written root-info artifact.
    pub fn load(path: &Path) -> Result<Self, CrawlError> {
        load_json(path)
    }
}

// ── Atomic JSON persistence ──────────────────────────────────────────

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Serialize `value` to `<path>.tmp`, then rename over `path`.
///
/// The rename is atomic on the same filesystem; on failure the temp file is
/// removed and whatever was at `path` before is untouched.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), CrawlError> {
    let json = serde_json::to_vec_pretty(value).map_err(|e| CrawlError::Json {
        path: path.to_owned(),
        source: e,
    })?;

    let tmp = tmp_path(path);
    fs::write(&tmp, json).map_err(|e| CrawlError::Io {
        path: tmp.clone(),
        source: e,
    })?;

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        CrawlError::Io {
            path: path.to_owned(),
            source: e,
        }
    })
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CrawlError> {
    let bytes = fs::read(path).map_err(|e| CrawlError::Io {
        path: path.to_owned(),
        source: e,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| CrawlError::Json {
        path: path.to_owned(),
        source: e,
    })
}
