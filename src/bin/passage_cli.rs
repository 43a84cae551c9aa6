//! passage CLI - command-line interface for passage
//!
//! # Examples
//!
//! ```bash
//! # Index a document (the collection becomes selected)
//! passage index ./handbook.pdf
//!
//! # Search the selected collection
//! passage search "how are refunds handled"
//!
//! # Manage collections
//! passage list
//! passage select handbookpdf
//! passage delete handbookpdf --force
//! ```

use clap::Parser;
use passage::cli::output::print_error;
use passage::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout stays clean for --format json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
