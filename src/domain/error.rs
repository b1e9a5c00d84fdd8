//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors describe documents that cannot be turned into a forest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed roadmap document: {0}")]
    MalformedDocument(String),

    #[error("malformed node at {path}: {reason}")]
    MalformedNode { path: String, reason: String },
}
