//! Repository roadmap browser.
//!
//! Loads a JSON forest of files with their endpoints and definitions and
//! presents it as a collapsible outline with root-level search and a
//! light/dark theme.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
