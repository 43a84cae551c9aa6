//! Search command - search a collection for passages

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::search::validate_query;
use crate::core::services::Services;
use crate::router::CollectionRouter;
use clap::Args;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query; each '.'-separated part is matched separately
    pub query: String,

    /// Nearest sentences per query part (clamped to search.max_k)
    #[arg(long, short = 'k')]
    pub k: Option<usize>,

    /// Search this collection instead of the selected one
    #[arg(long, short = 'c')]
    pub collection: Option<String>,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    router: &CollectionRouter,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_query(&args.query, services.config.search.max_query_length)?;

    let response = match &args.collection {
        Some(name) => router.search_in(name, &args.query, args.k).map_err(|e| {
            if e.is_not_found() {
                format!("{e}. Run 'passage list' to see available collections.")
            } else {
                e.to_string()
            }
        })?,
        None => router.search(&args.query, args.k)?,
    };

    match format {
        OutputFormat::Human => {
            if response.passages.is_empty() {
                println!(
                    "No passages found for '{}' in '{}'",
                    colors::label(&args.query),
                    colors::collection(&response.collection)
                );
            } else {
                println!(
                    "Found {} passage(s) in '{}':\n",
                    colors::number(&response.passages.len().to_string()),
                    colors::collection(&response.collection)
                );
                for (i, passage) in response.passages.iter().enumerate() {
                    println!("[{}] {}", colors::rank(&(i + 1).to_string()), passage.trim());
                    println!();
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
