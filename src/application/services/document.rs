//! Roadmap document service
//!
//! Fetches the roadmap document from its source and parses it into a forest.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{parse_document, DomainError, ParsedDocument};
use crate::infrastructure::traits::DocumentSource;

/// Service for loading the roadmap document.
pub struct DocumentService {
    source: Arc<dyn DocumentSource>,
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source }
    }

    pub fn location(&self) -> String {
        self.source.location()
    }

    /// Fetch and parse the document.
    ///
    /// Read, HTTP and JSON errors are fetch failures. Malformed nodes are
    /// skipped and listed in the result.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self) -> ApplicationResult<ParsedDocument> {
        let location = self.source.location();
        let text = self.source.fetch().map_err(|e| ApplicationError::Fetch {
            location: location.clone(),
            source: Box::new(e),
        })?;
        debug!("load: {} bytes from {}", text.len(), location);

        let parsed = parse_document(&text).map_err(|e| match e {
            DomainError::MalformedDocument(_) => ApplicationError::Fetch {
                location: location.clone(),
                source: Box::new(e),
            },
            other => ApplicationError::Domain(other),
        })?;
        if !parsed.skipped.is_empty() {
            warn!(
                "{} malformed node(s) skipped in {}",
                parsed.skipped.len(),
                location
            );
        }
        Ok(parsed)
    }
}
