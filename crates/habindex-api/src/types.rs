//! Response types for the openHAB REST API.
//!
//! All types match the JSON payloads of the read-only endpoints the crawler
//! uses. Field names use camelCase via `#[serde(rename_all = "camelCase")]`;
//! unmodeled fields are preserved through `extra` catch-alls so nothing the
//! server sends is silently dropped before normalization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Items ────────────────────────────────────────────────────────────

/// A single item record — from `GET /rest/items` (listing) or
/// `GET /rest/items/{name}` (detail).
///
/// Only `name` is required downstream; everything else defaults to empty.
/// Metadata namespaces are kept as opaque JSON (`namespace -> object`)
/// since their keys vary per integration (`semantics`, `alexa`, `ga`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Data/control type (`Switch`, `Number`, `Group`, `Group:Switch`, ...).
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    /// Icon/category hint.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Names of group items this item belongs to (membership, not ownership).
    #[serde(default)]
    pub group_names: Vec<String>,
    /// Namespace -> namespace-specific key/value object.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    /// Volatile current state — parsed but never persisted to the index.
    #[serde(default)]
    pub state: Option<String>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Root discovery document ──────────────────────────────────────────

/// One entry of the root document's `links` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootLink {
    /// Resource name (`items`, `things`, `rules`, ...).
    #[serde(rename = "type")]
    pub link_type: String,
    pub url: String,
}

/// Root/discovery document — from `GET /rest`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootResponse {
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub measurement_system: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// Nested runtime/build information object.
    #[serde(default)]
    pub runtime_info: Option<Value>,
    #[serde(default)]
    pub links: Vec<RootLink>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl RootResponse {
    /// Resolve an endpoint URL from the `links` list by resource name.
    pub fn link(&self, link_type: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.link_type == link_type)
            .map(|l| l.url.as_str())
    }
}
