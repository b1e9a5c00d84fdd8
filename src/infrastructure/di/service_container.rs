//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::DocumentService;
use crate::config::Settings;
use crate::infrastructure::render::TerminalRenderer;
use crate::infrastructure::source::{is_url, FileDocumentSource, HttpDocumentSource};
use crate::infrastructure::traits::{DocumentSource, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Where the roadmap document is fetched from
    pub source: Arc<dyn DocumentSource>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// The document source is chosen from `settings.document`: URLs are
    /// fetched over HTTP, anything else is read from disk.
    pub fn new(settings: Settings) -> Self {
        let source: Arc<dyn DocumentSource> = if is_url(&settings.document) {
            Arc::new(HttpDocumentSource::new(settings.document.clone()))
        } else {
            Arc::new(FileDocumentSource::new(
                Arc::new(RealFileSystem),
                settings.document.clone(),
            ))
        };
        Self::with_deps(settings, source)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, source: Arc<dyn DocumentSource>) -> Self {
        Self {
            settings: Arc::new(settings),
            source,
        }
    }

    pub fn document_service(&self) -> DocumentService {
        DocumentService::new(Arc::clone(&self.source))
    }

    /// Renderer configured with the title from settings.
    pub fn renderer(&self, color: bool) -> TerminalRenderer {
        let renderer = TerminalRenderer::new(self.settings.title.clone());
        if color {
            renderer
        } else {
            renderer.without_color()
        }
    }
}
