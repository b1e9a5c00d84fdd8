//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One node of the repository roadmap: a file with the endpoints it references,
/// the definitions it declares, and the nodes reachable from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Identifier, unique among siblings
    pub name: String,
    /// Referenced files (absent in the document == empty)
    pub endpoints: Vec<String>,
    /// Function and class definitions (absent in the document == empty)
    pub definitions: Vec<String>,
    /// Child nodes, owned exclusively by this node
    pub children: Vec<Arc<TreeNode>>,
}

impl TreeNode {
    /// Node with a name and no content.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoints: Vec::new(),
            definitions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_definitions<I, S>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definitions = definitions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = TreeNode>,
    {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    /// A node is expandable iff it has endpoints, definitions or children.
    pub fn is_expandable(&self) -> bool {
        is_non_empty(&self.endpoints)
            || is_non_empty(&self.definitions)
            || is_non_empty(&self.children)
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&Arc<TreeNode>> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Depth of this subtree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.depth())
            .max()
            .unwrap_or(0)
    }
}

/// Single "has content" predicate used for every optional sequence.
pub fn is_non_empty<T>(seq: &[T]) -> bool {
    !seq.is_empty()
}

/// Ordered sequence of independent trees.
///
/// Immutable once built. Cloning shares the underlying storage, so the
/// unfiltered forest can be handed out without copying.
#[derive(Debug, Clone)]
pub struct Forest(Arc<[Arc<TreeNode>]>);

impl Default for Forest {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl Forest {
    pub fn new(roots: Vec<Arc<TreeNode>>) -> Self {
        Self(roots.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[Arc<TreeNode>] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<TreeNode>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if both forests share the same storage.
    pub fn ptr_eq(&self, other: &Forest) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Find the node at `path`, starting at a root.
    pub fn resolve(&self, path: &NodePath) -> Option<&Arc<TreeNode>> {
        let (first, rest) = path.segments().split_first()?;
        let mut node = self.0.iter().find(|r| &r.name == first)?;
        for segment in rest {
            node = node.child(segment)?;
        }
        Some(node)
    }

    pub fn stats(&self) -> ForestStats {
        let mut stats = ForestStats {
            roots: self.len(),
            ..ForestStats::default()
        };
        for root in self.iter() {
            stats.max_depth = stats.max_depth.max(root.depth());
            accumulate(root, &mut stats);
        }
        stats
    }
}

fn accumulate(node: &TreeNode, stats: &mut ForestStats) {
    stats.nodes += 1;
    stats.endpoints += node.endpoints.len();
    stats.definitions += node.definitions.len();
    if node.is_expandable() {
        stats.expandable += 1;
    }
    for child in &node.children {
        accumulate(child, stats);
    }
}

impl From<Vec<TreeNode>> for Forest {
    fn from(roots: Vec<TreeNode>) -> Self {
        Self::new(roots.into_iter().map(Arc::new).collect())
    }
}

impl PartialEq for Forest {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0[..] == other.0[..]
    }
}

impl Eq for Forest {}

impl<'a> IntoIterator for &'a Forest {
    type Item = &'a Arc<TreeNode>;
    type IntoIter = std::slice::Iter<'a, Arc<TreeNode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Summary counts over a forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForestStats {
    pub roots: usize,
    pub nodes: usize,
    pub expandable: usize,
    pub endpoints: usize,
    pub definitions: usize,
    pub max_depth: usize,
}

/// Position of a node: the names from its root down to the node itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<String>);

impl NodePath {
    pub const SEPARATOR: &'static str = " > ";

    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for NodePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(Self::SEPARATOR))
    }
}

impl FromStr for NodePath {
    type Err = std::convert::Infallible;

    /// Parses `a > b > c`. Segments are trimmed; empty segments are dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.split('>')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect())
    }
}

/// Which content list of a node a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Endpoint,
    Definition,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Endpoint => write!(f, "endpoint"),
            ContentKind::Definition => write!(f, "definition"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "endpoint" | "e" => Ok(ContentKind::Endpoint),
            "definition" | "d" => Ok(ContentKind::Definition),
            other => Err(format!("unknown row kind: {other}")),
        }
    }
}

/// Visual theme applied to the whole composition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other} (expected light or dark)")),
        }
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Unresolvable variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_node_without_content_when_checking_expandable_then_false() {
        assert!(!TreeNode::leaf("utils").is_expandable());
    }

    #[test]
    fn given_node_with_any_content_when_checking_expandable_then_true() {
        assert!(TreeNode::leaf("a").with_endpoints(["/x"]).is_expandable());
        assert!(TreeNode::leaf("b").with_definitions(["f"]).is_expandable());
        assert!(TreeNode::leaf("c")
            .with_children([TreeNode::leaf("d")])
            .is_expandable());
    }

    #[test]
    fn given_nested_forest_when_resolving_path_then_finds_node() {
        let forest = Forest::from(vec![TreeNode::leaf("api")
            .with_children([TreeNode::leaf("v1").with_children([TreeNode::leaf("users")])])]);

        let path: NodePath = "api > v1 > users".parse().unwrap();
        assert_eq!(forest.resolve(&path).map(|n| n.name.as_str()), Some("users"));
        assert!(forest.resolve(&"api > v2".parse().unwrap()).is_none());
        assert!(forest.resolve(&NodePath::default()).is_none());
    }

    #[test]
    fn given_path_when_displayed_then_roundtrips_through_parse() {
        let path = NodePath::root("src").child("main.rs");
        assert_eq!(path.to_string(), "src > main.rs");
        assert_eq!(path.to_string().parse::<NodePath>().unwrap(), path);
    }

    #[test]
    fn given_theme_when_toggled_twice_then_returns_original() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn given_forest_when_computing_stats_then_counts_all_levels() {
        let forest = Forest::from(vec![
            TreeNode::leaf("api")
                .with_endpoints(["/a", "/b"])
                .with_children([TreeNode::leaf("v1").with_definitions(["handler"])]),
            TreeNode::leaf("docs"),
        ]);

        let stats = forest.stats();
        assert_eq!(stats.roots, 2);
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.expandable, 2);
        assert_eq!(stats.endpoints, 2);
        assert_eq!(stats.definitions, 1);
        assert_eq!(stats.max_depth, 2);
    }
}
