//! Canonical domain types persisted to the index artifacts.

pub mod item;
pub mod root_info;
pub mod tree;

pub use item::{Item, SemanticFlags};
pub use root_info::RootInfo;
pub use tree::{EquipmentNode, LocationNode, PointRef, SemanticTree};
