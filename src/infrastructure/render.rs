//! Terminal rendering of a composition.
//!
//! Outline structure comes from `termtree`, theme colors from `colored`.

use colored::{Color, ColoredString, Colorize};
use termtree::Tree;

use crate::application::presenter::{ContentSection, Glyph, OutlineItem};
use crate::application::Composition;
use crate::domain::{ContentKind, Theme};

const GLYPH_COLLAPSED: &str = "▸";
const GLYPH_EXPANDED: &str = "▾";

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub title: Color,
    pub expandable: Color,
    pub endpoint: Color,
    pub heading: Color,
    pub tooltip: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                title: Color::Black,
                expandable: Color::Blue,
                endpoint: Color::Blue,
                heading: Color::Magenta,
                tooltip: Color::Yellow,
            },
            Theme::Dark => Self {
                title: Color::BrightWhite,
                expandable: Color::Cyan,
                endpoint: Color::BrightCyan,
                heading: Color::BrightMagenta,
                tooltip: Color::BrightYellow,
            },
        }
    }
}

/// Turns compositions into terminal text.
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    title: String,
    color: bool,
}

impl TerminalRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            color: true,
        }
    }

    /// Plain text output, e.g. for pipes and tests.
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn render(&self, composition: &Composition) -> String {
        let palette = Palette::for_theme(composition.theme);
        let mut out = String::new();

        out.push_str(&self.paint(&self.title, palette.title, true).to_string());
        out.push('\n');
        let summary = if composition.query.is_empty() {
            format!(
                "{} roots [{} theme]",
                composition.total_roots, composition.theme
            )
        } else {
            format!(
                "{} of {} roots match {:?} [{} theme]",
                composition.items.len(),
                composition.total_roots,
                composition.query,
                composition.theme
            )
        };
        out.push_str(&summary);
        out.push('\n');

        for item in &composition.items {
            out.push_str(&self.outline(item, &palette).to_string());
        }
        out
    }

    /// Outline tree for one item and its visible descendants.
    pub fn outline(&self, item: &OutlineItem, palette: &Palette) -> Tree<String> {
        let mut tree = Tree::new(self.label(item, palette));
        if let Some(content) = &item.content {
            for section in [&content.endpoints, &content.definitions].into_iter().flatten() {
                tree.push(self.section(section, palette));
            }
            for child in &content.children {
                tree.push(self.outline(child, palette));
            }
        }
        tree
    }

    fn label(&self, item: &OutlineItem, palette: &Palette) -> String {
        let name = if item.expandable {
            self.paint(&item.label, palette.expandable, true).to_string()
        } else {
            item.label.clone()
        };
        match item.glyph {
            Some(Glyph::Collapsed) => format!("{GLYPH_COLLAPSED} {name}"),
            Some(Glyph::Expanded) => format!("{GLYPH_EXPANDED} {name}"),
            None => format!("  {name}"),
        }
    }

    fn section(&self, section: &ContentSection, palette: &Palette) -> Tree<String> {
        let heading = format!("{}:", section.heading());
        let mut tree = Tree::new(self.paint(&heading, palette.heading, true).to_string());
        for row in &section.rows {
            let mut line = match section.kind {
                ContentKind::Endpoint => {
                    self.paint(&row.label, palette.endpoint, false).to_string()
                }
                ContentKind::Definition => row.label.clone(),
            };
            if row.hovered {
                let tip = format!("[tooltip: {}]", row.label);
                line = format!("{line}  {}", self.paint(&tip, palette.tooltip, false));
            }
            tree.push(Tree::new(line));
        }
        tree
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> ColoredString {
        if !self.color {
            return text.normal().clear();
        }
        let painted = text.color(color);
        if bold {
            painted.bold()
        } else {
            painted
        }
    }
}
