//! Application layer: presentation model and use cases
//!
//! This layer holds the tree presentation state and depends on I/O boundary traits.

pub mod composer;
pub mod error;
pub mod events;
pub mod presenter;
pub mod search;
pub mod services;

pub use composer::{Composition, RootComposer};
pub use error::{ApplicationError, ApplicationResult};
pub use events::UiEvent;
pub use presenter::{NodePresenter, OutlineItem};
pub use search::filter_forest;
