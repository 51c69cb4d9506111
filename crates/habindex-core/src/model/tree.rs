// ── Semantic tree types ──
//
// Hierarchical Location -> Equipment -> Point view over the item set.
// Nodes reference items by name only; the flat map in the index is the
// single source of item data.

use serde::{Deserialize, Serialize};

/// Forest of top-level Location items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticTree {
    #[serde(default)]
    pub locations: Vec<LocationNode>,
}

/// A Location (room, floor) and its direct semantic children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationNode {
    /// Item name of this location.
    pub item: String,
    /// Nested locations contained in this one.
    #[serde(default)]
    pub children_locations: Vec<LocationNode>,
    /// Equipment grouped under this location.
    #[serde(default)]
    pub equipment: Vec<EquipmentNode>,
    /// Points attached directly to the location, not via equipment.
    #[serde(default)]
    pub points: Vec<PointRef>,
}

/// A logical device grouping and its point channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentNode {
    /// Item name of this equipment.
    pub item: String,
    #[serde(default)]
    pub points: Vec<PointRef>,
}

/// Reference to a Point item — always a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRef {
    pub item: String,
}

impl SemanticTree {
    /// Total number of nodes (locations, equipment, points) in the tree.
    pub fn node_count(&self) -> usize {
        fn count_loc(node: &LocationNode) -> usize {
            1 + node.points.len()
                + node.equipment.iter().map(|e| 1 + e.points.len()).sum::<usize>()
                + node.children_locations.iter().map(count_loc).sum::<usize>()
        }
        self.locations.iter().map(count_loc).sum()
    }
}
