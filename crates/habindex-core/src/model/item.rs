// ── Item domain type ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single home-automation entity (sensor, actuator, group).
///
/// `name` is the primary key across the whole item set. Volatile state is
/// intentionally not part of this record — the index is a structural
/// snapshot, and consumers fetch live state through `rest_url` when they
/// need freshness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    /// Human-readable display name.
    pub label: Option<String>,
    /// Data/control type (`Switch`, `Number`, `Group`, `Group:Switch`, ...).
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    /// Icon/category hint.
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Group items this item belongs to, in listing order.
    #[serde(default)]
    pub group_names: Vec<String>,
    /// Namespace -> namespace-specific key/value object. Kept as open JSON
    /// and validated lazily by the consumers that care about a namespace.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
    /// Derived semantic role flags. Assigned by the tree builder, which has
    /// global visibility over the membership graph.
    #[serde(default)]
    pub semantic: SemanticFlags,
    /// Relative path for live detail/state fetches.
    #[serde(rename = "rest_url")]
    pub rest_url: String,
}

impl Item {
    /// Whether this item is a group (plain `Group` or typed `Group:Switch`).
    pub fn is_group(&self) -> bool {
        self.item_type
            .as_deref()
            .is_some_and(|t| t == "Group" || t.starts_with("Group:"))
    }
}

/// Derived semantic role flags. Mutually exclusive given well-formed input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticFlags {
    pub is_location: bool,
    pub is_equipment: bool,
    pub is_point: bool,
    /// Tags indicating the measured/controlled property (`Light`,
    /// `Temperature`, ...) — the item's tags minus role tags.
    #[serde(default)]
    pub property_tags: Vec<String>,
}
