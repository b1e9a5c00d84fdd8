//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::{NodePath, Theme};

/// Browse a repository roadmap tree: files, endpoints and definitions
#[derive(Parser, Debug)]
#[command(name = "roadmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Roadmap document: file path or http(s) URL
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub document: Option<String>,

    /// Theme to start with
    #[arg(long, global = true, value_parser = parse_theme)]
    pub theme: Option<Theme>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the tree once
    Show {
        /// Only roots whose name or definitions contain this text
        #[arg(short, long, default_value = "")]
        query: String,

        /// Expand a node and its ancestors, e.g. "src > main.js" (repeatable)
        #[arg(short, long, value_parser = parse_path)]
        expand: Vec<NodePath>,

        /// Expand every node
        #[arg(short, long)]
        all: bool,
    },

    /// List the roots matching a query
    Search {
        /// Text to look for in root names and definitions
        query: String,
    },

    /// Browse the tree interactively
    Browse,

    /// Show document statistics
    Stats,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a template config file
    Template,
    /// Show config file locations
    Path,
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    s.parse()
}

fn parse_path(s: &str) -> Result<NodePath, String> {
    let path: NodePath = s.parse().map_err(|e| format!("{e}"))?;
    if path.is_empty() {
        return Err("empty node path".to_string());
    }
    Ok(path)
}
