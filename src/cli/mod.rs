//! CLI adapter for passage
//!
//! Provides a command-line interface for indexing documents and
//! searching collections. This module is parallel to `http/`: both
//! depend on `core/` and the collection router but not on each other.
//!
//! Unlike the server, the CLI remembers the selected collection
//! between invocations in the XDG state directory.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// passage - sentence-level document search
///
/// Index a document into a collection, then search it. Results are
/// whole passages rebuilt from the sentences around each match.
#[derive(Parser, Debug)]
#[command(name = "passage")]
#[command(version)]
#[command(about = "Sentence-level document search with passage reconstruction", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a document into a collection and select it
    Index(commands::IndexArgs),

    /// Search the selected collection
    Search(commands::SearchArgs),

    /// List all collections
    List(commands::collection::ListArgs),

    /// Select the collection searches go to
    Select(commands::collection::SelectArgs),

    /// Delete a collection and all its chunks
    Delete(commands::collection::DeleteArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  passage completions bash > ~/.local/share/bash-completion/completions/passage
    ///   zsh:   passage completions zsh > ~/.zfunc/_passage
    ///   fish:  passage completions fish > ~/.config/fish/completions/passage.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use crate::router::CollectionRouter;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    let command = match cli.command {
        Commands::Completions(args) => return commands::completions::execute(args),
        command => command,
    };

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;

    // Load configuration
    let config = Config::load_with_xdg(&xdg)?;

    // Create services and the persistent router
    let services = Arc::new(Services::new(config)?);
    let router = CollectionRouter::with_state_file(
        Arc::clone(&services),
        xdg.active_collection_file(),
    );

    // Execute command
    match command {
        Commands::Index(args) => commands::index::execute(args, &router, cli.format).await,
        Commands::Search(args) => {
            commands::search::execute(args, &router, &services, cli.format).await
        }
        Commands::List(args) => commands::collection::execute_list(args, &router, cli.format).await,
        Commands::Select(args) => {
            commands::collection::execute_select(args, &router, cli.format).await
        }
        Commands::Delete(args) => {
            commands::collection::execute_delete(args, &router, cli.format).await
        }
        Commands::ShowConfig(args) => {
            commands::config::execute(args, &services, &xdg, cli.format).await
        }
        Commands::Completions(_) => Ok(()), // Handled above
    }
}
