//! User-facing events applied to the root composer.

use crate::domain::{ContentKind, Forest, NodePath};

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Live query text; empty clears the filter
    SetQuery(String),
    /// A freshly loaded forest replaces the current one wholesale
    ReplaceForest(Forest),
    /// Click on a node's glyph or label
    Toggle(NodePath),
    /// Pointer entered an endpoint or definition row of a node
    HoverEnter {
        path: NodePath,
        kind: ContentKind,
        label: String,
    },
    /// Pointer left the hovered row of a node
    HoverLeave(NodePath),
    ToggleTheme,
}

impl UiEvent {
    /// Events that change which roots are shown.
    pub fn is_structural(&self) -> bool {
        matches!(self, UiEvent::SetQuery(_) | UiEvent::ReplaceForest(_))
    }
}
