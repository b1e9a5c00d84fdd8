//! Domain layer: roadmap tree entities and document parsing
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod document;
pub mod entities;
pub mod error;

pub use document::{parse_document, parse_value, ParsedDocument};
pub use entities::*;
pub use error::DomainError;
