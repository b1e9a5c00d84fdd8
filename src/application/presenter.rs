//! Node presenter: per-node expand/collapse and hover state.
//!
//! Presenters form a tree that mirrors the document tree. Each presenter owns
//! the state of exactly one node; a child presenter is created the first time
//! its parent is expanded and then kept, so collapsing a parent hides its
//! descendants without resetting them.

use std::sync::Arc;

use tracing::trace;

use crate::domain::{is_non_empty, ContentKind, NodePath, TreeNode};

/// Tooltip state for the rows of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverState {
    /// Row the pointer last entered, kept after leaving
    pub row: Option<(ContentKind, String)>,
    pub visible: bool,
}

impl HoverState {
    /// Label shown in the tooltip, if the tooltip is visible.
    pub fn tooltip(&self) -> Option<&str> {
        match (&self.row, self.visible) {
            (Some((_, label)), true) => Some(label.as_str()),
            _ => None,
        }
    }

    fn is_on(&self, kind: ContentKind, label: &str) -> bool {
        self.visible
            && self
                .row
                .as_ref()
                .is_some_and(|(k, l)| *k == kind && l == label)
    }
}

/// Expand/collapse affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Collapsed,
    Expanded,
}

/// One endpoint or definition row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    pub label: String,
    /// Tooltip is shown on this row
    pub hovered: bool,
}

/// Heading plus rows for one content list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSection {
    pub kind: ContentKind,
    pub rows: Vec<ContentRow>,
}

impl ContentSection {
    pub fn heading(&self) -> &'static str {
        match self.kind {
            ContentKind::Endpoint => "Endpoints",
            ContentKind::Definition => "Definitions",
        }
    }
}

/// Block shown below an expanded node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedContent {
    pub endpoints: Option<ContentSection>,
    pub definitions: Option<ContentSection>,
    pub children: Vec<OutlineItem>,
}

impl ExpandedContent {
    /// True if nothing would be revealed (non-expandable node).
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_none() && self.definitions.is_none() && self.children.is_empty()
    }
}

/// Rendered view of one node and, while expanded, its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    pub path: NodePath,
    pub label: String,
    pub expandable: bool,
    pub expanded: bool,
    /// Present only for expandable nodes
    pub glyph: Option<Glyph>,
    pub tooltip: Option<String>,
    /// Present only while expanded and expandable
    pub content: Option<ExpandedContent>,
}

impl OutlineItem {
    /// Number of items in this rendered subtree, including self.
    pub fn visible_count(&self) -> usize {
        1 + self
            .content
            .as_ref()
            .map(|c| c.children.iter().map(OutlineItem::visible_count).sum())
            .unwrap_or(0)
    }
}

/// Presents one node of the forest.
#[derive(Debug)]
pub struct NodePresenter {
    node: Arc<TreeNode>,
    path: NodePath,
    expanded: bool,
    hover: HoverState,
    children: Option<Vec<NodePresenter>>,
}

impl NodePresenter {
    pub fn new(node: Arc<TreeNode>, path: NodePath) -> Self {
        Self {
            node,
            path,
            expanded: false,
            hover: HoverState::default(),
            children: None,
        }
    }

    /// Presenter for a root of the forest.
    pub fn for_root(node: Arc<TreeNode>) -> Self {
        let path = NodePath::root(node.name.as_str());
        Self::new(node, path)
    }

    pub fn node(&self) -> &Arc<TreeNode> {
        &self.node
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn is_expandable(&self) -> bool {
        self.node.is_expandable()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    /// Flip the expand flag. Descendant flags are left untouched.
    pub fn toggle(&mut self) -> bool {
        self.set_expanded(!self.expanded);
        trace!(path = %self.path, expanded = self.expanded, "toggle");
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        if expanded {
            self.ensure_children();
        }
        self.expanded = expanded;
    }

    /// Expand this node and every descendant.
    pub fn expand_all(&mut self) {
        self.set_expanded(true);
        for child in self.ensure_children() {
            child.expand_all();
        }
    }

    /// Pointer entered one of this node's own rows.
    ///
    /// Returns false if the row is not rendered (collapsed node or no such
    /// row); state is then unchanged.
    pub fn hover_enter(&mut self, kind: ContentKind, label: &str) -> bool {
        if !self.expanded {
            return false;
        }
        let rows = match kind {
            ContentKind::Endpoint => &self.node.endpoints,
            ContentKind::Definition => &self.node.definitions,
        };
        if !rows.iter().any(|r| r == label) {
            return false;
        }
        self.hover = HoverState {
            row: Some((kind, label.to_string())),
            visible: true,
        };
        true
    }

    pub fn hover_leave(&mut self) {
        self.hover.visible = false;
    }

    /// Child presenters created so far (none before the first expansion).
    pub fn children(&self) -> &[NodePresenter] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Child presenter by name, creating the child presenters if needed.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut NodePresenter> {
        self.ensure_children().iter_mut().find(|c| c.node.name == name)
    }

    /// Descendant addressed by names relative to this node.
    pub fn descendant_mut(&mut self, relative: &[String]) -> Option<&mut NodePresenter> {
        match relative.split_first() {
            None => Some(self),
            Some((name, rest)) => self.child_mut(name)?.descendant_mut(rest),
        }
    }

    fn ensure_children(&mut self) -> &mut Vec<NodePresenter> {
        let node = &self.node;
        let path = &self.path;
        self.children.get_or_insert_with(|| {
            node.children
                .iter()
                .map(|child| NodePresenter::new(Arc::clone(child), path.child(child.name.as_str())))
                .collect()
        })
    }

    pub fn render(&self) -> OutlineItem {
        let expandable = self.is_expandable();
        let content = (self.expanded && expandable).then(|| ExpandedContent {
            endpoints: self.section(ContentKind::Endpoint, &self.node.endpoints),
            definitions: self.section(ContentKind::Definition, &self.node.definitions),
            children: self.children().iter().map(NodePresenter::render).collect(),
        });

        OutlineItem {
            path: self.path.clone(),
            label: self.node.name.clone(),
            expandable,
            expanded: self.expanded,
            glyph: expandable.then_some(if self.expanded {
                Glyph::Expanded
            } else {
                Glyph::Collapsed
            }),
            tooltip: content
                .as_ref()
                .and(self.hover.tooltip())
                .map(str::to_string),
            content,
        }
    }

    fn section(&self, kind: ContentKind, labels: &[String]) -> Option<ContentSection> {
        if !is_non_empty(labels) {
            return None;
        }
        // Rows are keyed by label; a repeated label gets the tooltip only once.
        let mut marked = false;
        let rows = labels
            .iter()
            .map(|label| {
                let hovered = !marked && self.hover.is_on(kind, label);
                marked |= hovered;
                ContentRow {
                    label: label.clone(),
                    hovered,
                }
            })
            .collect();
        Some(ContentSection { kind, rows })
    }
}
