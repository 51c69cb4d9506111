//! Semantic role classification and tree assembly.
//!
//! Role resolution runs in priority order: the `semantics` metadata
//! namespace, then semantic tags, then structural inference over the
//! membership graph. Tree assembly attaches every node under its first
//! resolvable parent only, so the output is a tree even when the group
//! graph is not; cyclic branches are truncated with a warning.
//!
//! All relationships are name-keyed lookups into the flat item map (arena
//! style) — no node owns another, and traversals carry a per-path visited
//! set to guarantee termination.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::model::{EquipmentNode, Item, LocationNode, PointRef, SemanticTree};

/// Semantic role of an item in the Location -> Equipment -> Point hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Location,
    Equipment,
    Point,
}

/// Result of tree assembly.
#[derive(Debug)]
pub struct TreeOutcome {
    pub tree: SemanticTree,
    pub warnings: Vec<String>,
}

// ── Role resolution ──────────────────────────────────────────────────

fn role_from_str(s: &str) -> Option<Role> {
    match s {
        "Location" => Some(Role::Location),
        "Equipment" => Some(Role::Equipment),
        "Point" => Some(Role::Point),
        _ => None,
    }
}

/// Explicit role from the `semantics` metadata namespace.
///
/// Recognizes the per-role type-hint keys (`locationType: "Room"`,
/// `equipmentType: "Lightbulb"`, `pointType: "Measurement"`) as well as the
/// combined `value` form (`"Location_Indoor_Room"`).
fn metadata_role(item: &Item) -> Option<Role> {
    let ns = item.metadata.get("semantics")?.as_object()?;

    if ns.contains_key("locationType") {
        return Some(Role::Location);
    }
    if ns.contains_key("equipmentType") {
        return Some(Role::Equipment);
    }
    if ns.contains_key("pointType") {
        return Some(Role::Point);
    }

    let value = ns.get("value").and_then(Value::as_str)?;
    role_from_str(value.split('_').next().unwrap_or(value))
}

/// Role from semantic tags — a tag equal to or ending in a role name.
fn tag_role(item: &Item) -> Option<Role> {
    item.tags.iter().find_map(|t| {
        if t.ends_with("Location") {
            Some(Role::Location)
        } else if t.ends_with("Equipment") {
            Some(Role::Equipment)
        } else if t.ends_with("Point") {
            Some(Role::Point)
        } else {
            None
        }
    })
}

fn is_role_tag(tag: &str) -> bool {
    tag.ends_with("Location") || tag.ends_with("Equipment") || tag.ends_with("Point")
}

/// Resolves roles with global visibility over the membership graph.
struct RoleResolver<'a> {
    items: &'a IndexMap<String, Item>,
    /// group name -> member item names (reverse of `group_names`).
    members: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> RoleResolver<'a> {
    fn new(items: &'a IndexMap<String, Item>) -> Self {
        let mut members: HashMap<&str, Vec<&str>> = HashMap::new();
        for item in items.values() {
            for group in &item.group_names {
                // Memberships pointing at unknown names are ignored.
                if items.contains_key(group.as_str()) {
                    members
                        .entry(group.as_str())
                        .or_default()
                        .push(item.name.as_str());
                }
            }
        }
        Self { items, members }
    }

    fn resolve(&self, item: &Item) -> Option<Role> {
        metadata_role(item)
            .or_else(|| tag_role(item))
            .or_else(|| self.structural_role(item))
    }

    /// Fallback inference for items with neither semantics metadata nor
    /// role tags: a parentless group with members is a Location, a group
    /// whose members are all points is Equipment, a plain leaf is a Point.
    fn structural_role(&self, item: &Item) -> Option<Role> {
        let members = self.members.get(item.name.as_str());
        let has_members = members.is_some_and(|m| !m.is_empty());
        let has_parent = item
            .group_names
            .iter()
            .any(|g| self.items.contains_key(g.as_str()));

        if item.is_group() && has_members {
            if !has_parent {
                return Some(Role::Location);
            }
            if members
                .into_iter()
                .flatten()
                .all(|m| self.is_leaf_point(m))
            {
                return Some(Role::Equipment);
            }
            return None;
        }

        if !item.is_group() && !has_members {
            return Some(Role::Point);
        }

        None
    }

    /// A member counts as a point if it carries an explicit Point role or
    /// is a plain leaf (non-group with no members of its own).
    fn is_leaf_point(&self, name: &str) -> bool {
        let Some(item) = self.items.get(name) else {
            return false;
        };
        if let Some(role) = metadata_role(item).or_else(|| tag_role(item)) {
            return role == Role::Point;
        }
        !item.is_group() && !self.members.contains_key(name)
    }
}

/// Assign semantic flags to every item in place.
///
/// Returns one warning per item whose role could not be resolved; such
/// items stay in the flat map but will not appear in the tree.
pub fn classify(items: &mut IndexMap<String, Item>) -> Vec<String> {
    let roles: HashMap<String, Option<Role>> = {
        let resolver = RoleResolver::new(items);
        items
            .values()
            .map(|item| (item.name.clone(), resolver.resolve(item)))
            .collect()
    };

    let mut warnings = Vec::new();
    for item in items.values_mut() {
        let role = roles.get(item.name.as_str()).copied().flatten();
        item.semantic.is_location = role == Some(Role::Location);
        item.semantic.is_equipment = role == Some(Role::Equipment);
        item.semantic.is_point = role == Some(Role::Point);
        item.semantic.property_tags = item
            .tags
            .iter()
            .filter(|t| !is_role_tag(t))
            .cloned()
            .collect();

        if role.is_none() {
            let message = format!("item '{}' has no resolvable semantic role", item.name);
            warn!("{message}");
            warnings.push(message);
        }
    }
    warnings
}

// ── Tree assembly ────────────────────────────────────────────────────

/// Name-keyed adjacency computed from the classified items.
struct Assembly<'a> {
    child_locs: HashMap<&'a str, Vec<&'a str>>,
    equipment_at: HashMap<&'a str, Vec<&'a str>>,
    points_of_equipment: HashMap<&'a str, Vec<&'a str>>,
    points_at_location: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Assembly<'a> {
    fn location_node(
        &self,
        name: &'a str,
        path: &mut Vec<&'a str>,
        reachable: &mut HashSet<&'a str>,
        warnings: &mut Vec<String>,
    ) -> LocationNode {
        path.push(name);
        reachable.insert(name);

        let children_locations = self
            .child_locs
            .get(name)
            .into_iter()
            .flatten()
            .copied()
            .filter_map(|child| {
                if path.contains(&child) {
                    let message =
                        format!("membership cycle at '{child}', branch truncated");
                    warn!("{message}");
                    warnings.push(message);
                    None
                } else {
                    Some(self.location_node(child, path, reachable, warnings))
                }
            })
            .collect();

        let equipment = self
            .equipment_at
            .get(name)
            .into_iter()
            .flatten()
            .map(|eq| EquipmentNode {
                item: (*eq).to_owned(),
                points: self
                    .points_of_equipment
                    .get(eq)
                    .into_iter()
                    .flatten()
                    .map(|p| PointRef { item: (*p).to_owned() })
                    .collect(),
            })
            .collect();

        let points = self
            .points_at_location
            .get(name)
            .into_iter()
            .flatten()
            .map(|p| PointRef { item: (*p).to_owned() })
            .collect();

        path.pop();

        LocationNode {
            item: name.to_owned(),
            children_locations,
            equipment,
            points,
        }
    }
}

/// Assemble the semantic tree from classified items.
///
/// Roots are Locations with no Location parent. Every node is attached
/// under its first resolvable parent only; points prefer an attached
/// Equipment parent and fall back to a Location. Items whose parents never
/// lead to a root (orphans, cycles) are left out of the tree and reported.
pub fn build_tree(items: &IndexMap<String, Item>) -> TreeOutcome {
    let mut warnings = Vec::new();

    let is_location =
        |name: &str| items.get(name).is_some_and(|i| i.semantic.is_location);

    let mut roots: Vec<&str> = Vec::new();
    let mut assembly = Assembly {
        child_locs: HashMap::new(),
        equipment_at: HashMap::new(),
        points_of_equipment: HashMap::new(),
        points_at_location: HashMap::new(),
    };

    for item in items.values().filter(|i| i.semantic.is_location) {
        match item.group_names.iter().find(|g| is_location(g.as_str())) {
            Some(parent) => assembly
                .child_locs
                .entry(parent.as_str())
                .or_default()
                .push(item.name.as_str()),
            None => roots.push(item.name.as_str()),
        }
    }

    // Equipment without a location parent stays reachable through the flat
    // map only.
    let mut attached_equipment: HashSet<&str> = HashSet::new();
    for item in items.values().filter(|i| i.semantic.is_equipment) {
        if let Some(parent) = item.group_names.iter().find(|g| is_location(g.as_str())) {
            assembly
                .equipment_at
                .entry(parent.as_str())
                .or_default()
                .push(item.name.as_str());
            attached_equipment.insert(item.name.as_str());
        }
    }

    for item in items.values().filter(|i| i.semantic.is_point) {
        if let Some(eq) = item
            .group_names
            .iter()
            .find(|g| attached_equipment.contains(g.as_str()))
        {
            assembly
                .points_of_equipment
                .entry(eq.as_str())
                .or_default()
                .push(item.name.as_str());
        } else if let Some(loc) =
            item.group_names.iter().find(|g| is_location(g.as_str()))
        {
            assembly
                .points_at_location
                .entry(loc.as_str())
                .or_default()
                .push(item.name.as_str());
        }
        // No semantic parent: omitted from the tree, kept in the map.
    }

    let mut reachable: HashSet<&str> = HashSet::new();
    let mut path: Vec<&str> = Vec::new();
    let locations = roots
        .iter()
        .map(|&root| assembly.location_node(root, &mut path, &mut reachable, &mut warnings))
        .collect();

    for item in items.values().filter(|i| i.semantic.is_location) {
        if !reachable.contains(item.name.as_str()) {
            let message = format!(
                "location '{}' is not reachable from any root location (membership cycle?)",
                item.name
            );
            warn!("{message}");
            warnings.push(message);
        }
    }

    TreeOutcome {
        tree: SemanticTree { locations },
        warnings,
    }
}
