//! Root-level search over the forest.
//!
//! A root survives a non-empty query iff its own name or one of its own
//! definitions contains the query, ignoring case. Endpoints and descendants
//! are not searched.

use tracing::debug;

use crate::domain::{Forest, TreeNode};

/// Filter the roots of `forest` by `query`.
///
/// An empty query returns the same forest (shared storage, no copy).
pub fn filter_forest(query: &str, forest: &Forest) -> Forest {
    if query.is_empty() {
        return forest.clone();
    }
    let needle = query.to_lowercase();
    let kept: Vec<_> = forest
        .iter()
        .filter(|root| matches_root(root, &needle))
        .cloned()
        .collect();
    debug!(query, kept = kept.len(), total = forest.len(), "filter");
    Forest::new(kept)
}

/// Shallow match of one root against an already lowercased needle.
pub fn matches_root(node: &TreeNode, needle: &str) -> bool {
    contains_ignore_case(&node.name, needle)
        || node
            .definitions
            .iter()
            .any(|definition| contains_ignore_case(definition, needle))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
