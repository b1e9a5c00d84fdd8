//! Root composer: owns the forest, the query, the theme and the root presenters.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::application::events::UiEvent;
use crate::application::presenter::{NodePresenter, OutlineItem};
use crate::application::search::filter_forest;
use crate::application::services::DocumentService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{ContentKind, Forest, NodePath, ParsedDocument, Theme};

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub theme: Theme,
    pub query: String,
    /// Roots in the unfiltered forest
    pub total_roots: usize,
    pub items: Vec<OutlineItem>,
}

/// Holds the loaded forest and derives what is shown from it.
#[derive(Debug, Default)]
pub struct RootComposer {
    forest: Forest,
    query: String,
    filtered: Forest,
    theme: Theme,
    presenters: Vec<NodePresenter>,
    fetch_requested: bool,
    /// Query or forest changed since the last recomputation
    stale: bool,
}

impl RootComposer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// Load the document once. Failures are logged and leave the forest empty.
    ///
    /// Returns false if a fetch was already requested.
    #[instrument(level = "debug", skip_all)]
    pub fn initialize(&mut self, service: &DocumentService) -> bool {
        if !self.begin_fetch() {
            return false;
        }
        let replacement = self.complete_fetch(service.load());
        self.apply(replacement);
        true
    }

    /// Mark the single fetch as started. Returns false on any later call.
    pub fn begin_fetch(&mut self) -> bool {
        if self.fetch_requested {
            debug!("fetch already requested, ignoring");
            return false;
        }
        self.fetch_requested = true;
        true
    }

    /// Deliver the outcome of the fetch started with [`Self::begin_fetch`].
    ///
    /// A loaded forest comes back as a [`UiEvent::ReplaceForest`] so it can be
    /// applied in the same batch as pending input. A failure is logged and
    /// leaves the forest as it is.
    pub fn complete_fetch(
        &mut self,
        result: ApplicationResult<ParsedDocument>,
    ) -> Option<UiEvent> {
        match result {
            Ok(doc) => {
                info!("loaded roadmap: {} roots", doc.forest.len());
                Some(UiEvent::ReplaceForest(doc.forest))
            }
            Err(e) => {
                error!("Error fetching roadmap tree: {e}: {}", source_chain(&e));
                None
            }
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn filtered(&self) -> &Forest {
        &self.filtered
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn presenters(&self) -> &[NodePresenter] {
        &self.presenters
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.stale = true;
        self.recompute();
    }

    pub fn replace_forest(&mut self, forest: Forest) {
        self.forest = forest;
        self.stale = true;
        self.recompute();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Toggle the node at `path`; returns its new expand flag.
    pub fn toggle(&mut self, path: &NodePath) -> ApplicationResult<bool> {
        Ok(self.presenter_mut(path)?.toggle())
    }

    /// Expand `path` and every ancestor on the way to it.
    ///
    /// Nothing changes unless the whole path resolves among the shown roots.
    pub fn expand_path(&mut self, path: &NodePath) -> ApplicationResult<()> {
        self.recompute();
        if self.filtered.resolve(path).is_none() {
            return Err(ApplicationError::UnknownNode(path.to_string()));
        }
        for depth in 1..=path.depth() {
            let prefix: NodePath = path.segments()[..depth].iter().cloned().collect();
            self.presenter_mut(&prefix)?.set_expanded(true);
        }
        Ok(())
    }

    pub fn expand_all(&mut self) {
        for presenter in &mut self.presenters {
            presenter.expand_all();
        }
    }

    pub fn hover_enter(
        &mut self,
        path: &NodePath,
        kind: ContentKind,
        label: &str,
    ) -> ApplicationResult<()> {
        if self.presenter_mut(path)?.hover_enter(kind, label) {
            Ok(())
        } else {
            Err(ApplicationError::UnknownNode(format!(
                "{path}: no visible {kind} row {label}"
            )))
        }
    }

    pub fn hover_leave(&mut self, path: &NodePath) -> ApplicationResult<()> {
        self.presenter_mut(path)?.hover_leave();
        Ok(())
    }

    /// Apply a batch of events from one tick.
    ///
    /// Query and forest changes are folded into a single recomputation, done
    /// before the next node event and at the end of the batch. Node events
    /// that fail are logged and returned; the rest of the batch still applies.
    pub fn apply<I>(&mut self, events: I) -> Vec<ApplicationError>
    where
        I: IntoIterator<Item = UiEvent>,
    {
        let mut errors = Vec::new();
        for event in events {
            if !event.is_structural() {
                self.recompute();
            }
            let result = match event {
                UiEvent::SetQuery(query) => {
                    self.query = query;
                    self.stale = true;
                    Ok(())
                }
                UiEvent::ReplaceForest(forest) => {
                    self.forest = forest;
                    self.stale = true;
                    Ok(())
                }
                UiEvent::Toggle(path) => self.toggle(&path).map(|_| ()),
                UiEvent::HoverEnter { path, kind, label } => self.hover_enter(&path, kind, &label),
                UiEvent::HoverLeave(path) => self.hover_leave(&path),
                UiEvent::ToggleTheme => {
                    self.toggle_theme();
                    Ok(())
                }
            };
            if let Err(e) = result {
                debug!("event failed: {e}");
                errors.push(e);
            }
        }
        self.recompute();
        errors
    }

    pub fn render(&self) -> Composition {
        Composition {
            theme: self.theme,
            query: self.query.clone(),
            total_roots: self.forest.len(),
            items: self.presenters.iter().map(NodePresenter::render).collect(),
        }
    }

    fn presenter_mut(&mut self, path: &NodePath) -> ApplicationResult<&mut NodePresenter> {
        let unknown = || ApplicationError::UnknownNode(path.to_string());
        let (root, rest) = path.segments().split_first().ok_or_else(unknown)?;
        self.presenters
            .iter_mut()
            .find(|p| &p.node().name == root)
            .and_then(|p| p.descendant_mut(rest))
            .ok_or_else(unknown)
    }

    /// Rebuild the filtered forest and reconcile root presenters.
    ///
    /// A presenter survives only while its node (same allocation) is still
    /// shown, so a replaced forest starts from fresh state.
    fn recompute(&mut self) {
        if !self.stale {
            return;
        }
        self.stale = false;
        self.filtered = filter_forest(&self.query, &self.forest);

        let mut previous = std::mem::take(&mut self.presenters);
        self.presenters = self
            .filtered
            .iter()
            .map(|node| {
                match previous
                    .iter()
                    .position(|p| Arc::ptr_eq(p.node(), node))
                {
                    Some(index) => previous.swap_remove(index),
                    None => NodePresenter::for_root(Arc::clone(node)),
                }
            })
            .collect();
        debug!(
            "recompute: query={:?} shown={} dropped={}",
            self.query,
            self.presenters.len(),
            previous.len()
        );
    }
}

fn source_chain(e: &dyn std::error::Error) -> String {
    let mut parts = Vec::new();
    let mut current = e.source();
    while let Some(cause) = current {
        parts.push(cause.to_string());
        current = cause.source();
    }
    parts.join(": ")
}
