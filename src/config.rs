//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/roadmap/roadmap.toml`
//! 3. Local config: `<dir>/.roadmap.toml` (usually the working directory)
//! 4. Environment variables: `ROADMAP_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, Theme};
use crate::infrastructure::source::is_url;

/// Default location of the roadmap document, relative to the working directory.
pub const DEFAULT_DOCUMENT: &str = "data/roadmap-tree.json";

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub document: Option<String>,
    pub theme: Option<Theme>,
    pub title: Option<String>,
}

/// Unified configuration for roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Roadmap document: file path or http(s) URL
    pub document: String,
    /// Initial theme
    pub theme: Theme,
    /// Heading shown above the tree
    pub title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            document: DEFAULT_DOCUMENT.to_string(),
            theme: Theme::Light,
            title: "GitHub Repository Roadmap".to_string(),
        }
    }
}

/// Get the XDG config directory for roadmap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "roadmap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("roadmap.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".roadmap.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in the document path.
    ///
    /// URLs are left alone.
    fn expand_paths(&mut self) {
        if !is_url(&self.document) {
            self.document = expand_env_vars(&self.document);
        }
    }

    /// Overlay wins wherever it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            document: overlay
                .document
                .clone()
                .unwrap_or_else(|| self.document.clone()),
            theme: overlay.theme.unwrap_or(self.theme),
            title: overlay.title.clone().unwrap_or_else(|| self.title.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.roadmap.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        let local = local_dir
            .map(local_config_path)
            .filter(|p| p.exists());
        Self::load_from(global.as_deref(), local.as_deref())
    }

    /// Load settings from explicit config files (each optional).
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 3. Local config
        if let Some(path) = local {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        // Expand ~ and $VAR in the document path
        current.expand_paths();

        Ok(current)
    }

    /// Apply ROADMAP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ROADMAP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("document") {
            settings.document = val;
        }
        if let Ok(val) = config.get_string("theme") {
            settings.theme = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("title") {
            settings.title = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# roadmap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/roadmap/roadmap.toml
#   Local:  ./.roadmap.toml
#   Env:    ROADMAP_DOCUMENT, ROADMAP_THEME, ROADMAP_TITLE
#   Flags:  --document, --theme

# Roadmap document: a file path (~ and $VAR are expanded) or an http(s) URL
# document = "{DEFAULT_DOCUMENT}"

# Initial theme: "light" or "dark"
# theme = "light"

# Heading shown above the tree
# title = "GitHub Repository Roadmap"
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
