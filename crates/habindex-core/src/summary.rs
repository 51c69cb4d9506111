//! Run summary — what one crawl did and what it skipped.

use serde::Serialize;

use crate::error::ItemIssue;

/// Outcome of a successful crawl run.
///
/// Per-item problems are counted here instead of failing the run; the
/// process exit status only reflects whole-run failures.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Items returned by the listing endpoint.
    pub items_listed: usize,
    /// Items that made it into `items_by_name`.
    pub items_indexed: usize,
    /// Raw records dropped for a missing/empty `name`.
    pub invalid_items: usize,
    /// Per-item detail fetches that failed (listing record kept).
    pub detail_failures: usize,
    /// Membership-graph anomalies (cycles, unresolvable roles).
    pub structural_warnings: usize,
    /// Top-level locations in the semantic tree.
    pub tree_roots: usize,
    /// Nodes attached anywhere in the semantic tree.
    pub tree_nodes: usize,
    /// The root document could not be parsed; an empty `rest_root.json`
    /// was written and the item crawl continued.
    pub root_info_degraded: bool,
    /// Wall-clock duration of the whole run.
    pub duration_ms: u64,
    /// The accumulated issues behind the counts above.
    #[serde(skip)]
    pub issues: Vec<ItemIssue>,
}

impl RunSummary {
    /// Record an issue and bump the matching counter.
    pub fn record(&mut self, issue: ItemIssue) {
        match &issue {
            ItemIssue::InvalidItem { .. } => self.invalid_items += 1,
            ItemIssue::DetailFetch { .. } => self.detail_failures += 1,
            ItemIssue::Structural { .. } => self.structural_warnings += 1,
        }
        self.issues.push(issue);
    }

    /// Compact single-line rendering for logs and quiet CLI output.
    pub fn one_line(&self) -> String {
        format!(
            "indexed {}/{} items ({} invalid, {} detail failures, {} structural warnings), \
             {} tree roots, {}ms",
            self.items_indexed,
            self.items_listed,
            self.invalid_items,
            self.detail_failures,
            self.structural_warnings,
            self.tree_roots,
            self.duration_ms
        )
    }
}
