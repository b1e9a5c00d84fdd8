//! Command dispatch: one function per subcommand

use std::io::{self, IsTerminal};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::RootComposer;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::session::Session;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Forest, NodePath};
use crate::infrastructure::di::ServiceContainer;

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let cwd = std::env::current_dir()
        .map_err(|e| CliError::Usage(format!("cannot determine working directory: {e}")))?;
    let settings = effective_settings(cli, Settings::load(Some(&cwd))?);
    debug!("settings: {:?}", settings);

    match &cli.command {
        Some(Commands::Show { query, expand, all }) => {
            cmd_show(cli, settings, query, expand, *all)
        }
        Some(Commands::Search { query }) => cmd_search(settings, query),
        Some(Commands::Browse) => cmd_browse(cli, settings),
        Some(Commands::Stats) => cmd_stats(settings),
        Some(Commands::Config { command }) => cmd_config(settings, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "roadmap", &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| CliError::Usage(e.to_string()))?;
            Ok(())
        }
    }
}

/// Command line flags override every config layer.
fn effective_settings(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(document) = &cli.document {
        settings.document = document.clone();
    }
    if let Some(theme) = cli.theme {
        settings.theme = theme;
    }
    settings
}

fn use_color(cli: &Cli) -> bool {
    !cli.no_color && io::stdout().is_terminal()
}

/// One-shot commands fail loudly when the document cannot be loaded.
fn load_forest(container: &ServiceContainer) -> CliResult<Forest> {
    let doc = container.document_service().load()?;
    for skipped in &doc.skipped {
        output::warning(skipped);
    }
    Ok(doc.forest)
}

#[instrument(skip(cli, settings))]
fn cmd_show(
    cli: &Cli,
    settings: Settings,
    query: &str,
    expand: &[NodePath],
    all: bool,
) -> CliResult<()> {
    let theme = settings.theme;
    let container = ServiceContainer::new(settings);
    let forest = load_forest(&container)?;

    let mut composer = RootComposer::new(theme);
    composer.replace_forest(forest);
    composer.set_query(query);
    if all {
        composer.expand_all();
    }
    for path in expand {
        composer.expand_path(path)?;
    }

    let frame = container
        .renderer(use_color(cli))
        .render(&composer.render());
    output::info(frame.trim_end());
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_search(settings: Settings, query: &str) -> CliResult<()> {
    if query.is_empty() {
        return Err(CliError::InvalidArgs(
            "search query must not be empty (use `show` for the whole tree)".into(),
        ));
    }
    let container = ServiceContainer::new(settings);
    let forest = load_forest(&container)?;

    let mut composer = RootComposer::new(container.settings.theme);
    composer.replace_forest(forest);
    composer.set_query(query);

    if composer.filtered().is_empty() {
        output::warning(&format!("no roots match {query:?}"));
        return Ok(());
    }
    for root in composer.filtered() {
        output::info(&root.name);
    }
    Ok(())
}

#[instrument(skip(cli, settings))]
fn cmd_browse(cli: &Cli, settings: Settings) -> CliResult<()> {
    let theme = settings.theme;
    let container = ServiceContainer::new(settings);
    output::header(&format!("roadmap: {}", container.source.location()));
    output::detail("? for help, q to quit");

    let mut session = Session::new(theme, container.renderer(use_color(cli)), io::stdout());
    session.run(container.document_service(), io::BufReader::new(io::stdin()))?;
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_stats(settings: Settings) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let forest = load_forest(&container)?;
    let stats = forest.stats();

    output::header(&container.source.location());
    output::action("roots", &stats.roots);
    output::action("nodes", &stats.nodes);
    output::action("expandable", &stats.expandable);
    output::action("endpoints", &stats.endpoints);
    output::action("definitions", &stats.definitions);
    output::action("max depth", &stats.max_depth);
    Ok(())
}

fn cmd_config(settings: Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            let cwd = std::env::current_dir()
                .map_err(|e| CliError::Usage(format!("cannot determine working directory: {e}")))?;
            output::action("local", &local_config_path(&cwd).display());
        }
    }
    Ok(())
}
