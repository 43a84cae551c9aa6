//! Collection commands - list, select and delete collections

use crate::cli::output::{colors, format_bytes, format_relative_time};
use crate::cli::OutputFormat;
use crate::router::CollectionRouter;
use clap::Args;
use std::io::{self, Write};

/// Arguments for list
#[derive(Args, Debug)]
pub struct ListArgs {}

/// Arguments for select
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Collection name
    pub name: String,
}

/// Arguments for delete
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection name
    pub name: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

fn not_found_hint(err: crate::core::error::PassageError) -> String {
    if err.is_not_found() {
        format!("{err}. Run 'passage list' to see available collections.")
    } else {
        err.to_string()
    }
}

/// Execute list command
pub async fn execute_list(
    _args: ListArgs,
    router: &CollectionRouter,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = router.list()?;

    match format {
        OutputFormat::Human => {
            if response.collections.is_empty() {
                println!(
                    "No collections found. Run '{}' to index a document.",
                    colors::label("passage index <file>")
                );
            } else {
                println!(
                    "{} ({}):",
                    colors::label("Collections"),
                    colors::number(&response.collections.len().to_string())
                );
                for info in &response.collections {
                    let marker = if info.name == response.active { "*" } else { " " };
                    println!(
                        "{} {:<24} {:>8} chunks  {:>10}  {}  {}",
                        colors::success(marker),
                        colors::collection(&info.name),
                        colors::number(&info.chunks.to_string()),
                        colors::number(&format_bytes(info.size_bytes)),
                        colors::dim(&format_relative_time(&info.created_at)),
                        colors::file_path(info.source.as_deref().unwrap_or("-"))
                    );
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Execute select command
pub async fn execute_select(
    args: SelectArgs,
    router: &CollectionRouter,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let collection = router.select(&args.name).map_err(not_found_hint)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} collection '{}'",
                colors::success("Selected"),
                colors::collection(collection.name())
            );
        }
        OutputFormat::Json => {
            let response = serde_json::json!({
                "selected": true,
                "collection": collection.name()
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Execute delete command
pub async fn execute_delete(
    args: DeleteArgs,
    router: &CollectionRouter,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    // Confirmation prompt unless --force
    if !args.force {
        print!(
            "Delete collection '{}'? [y/N] ",
            colors::collection(&args.name)
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", colors::dim("Cancelled."));
            return Ok(());
        }
    }

    let deleted = router.delete(&args.name).map_err(not_found_hint)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} collection '{}', selected '{}'",
                colors::success("Deleted"),
                colors::collection(&deleted),
                colors::collection(&router.active())
            );
        }
        OutputFormat::Json => {
            let response = serde_json::json!({
                "deleted": true,
                "collection": deleted,
                "active": router.active()
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
