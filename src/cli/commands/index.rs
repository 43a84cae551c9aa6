//! Index command - index a document into a collection

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::types::IndexOutcome;
use crate::router::CollectionRouter;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Document to index (.txt, .md, .pdf or .epub)
    pub file: PathBuf,

    /// Collection name (defaults to the file name, sanitized)
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks_created: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl From<&IndexOutcome> for IndexResponse {
    fn from(outcome: &IndexOutcome) -> Self {
        let (chunks_created, duration_ms) = match outcome {
            IndexOutcome::Created { stats, .. } => {
                (Some(stats.chunks_created), Some(stats.duration_ms))
            }
            IndexOutcome::AlreadyIndexed { .. } => (None, None),
        };

        Self {
            message: outcome.message().to_string(),
            collection: outcome.collection().name().to_string(),
            chunks_created,
            duration_ms,
        }
    }
}

/// Execute the index command
pub async fn execute(
    args: IndexArgs,
    router: &CollectionRouter,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(&args.file).map_err(|e| {
        format!(
            "Cannot read '{}': {}. Make sure the file exists and is accessible.",
            args.file.display(),
            e
        )
    })?;

    let filename = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("'{}' is not a file", args.file.display()))?;
    let name = args.name.as_deref().unwrap_or(&filename);

    let outcome = router.index(name, &filename, &bytes)?;
    let response = IndexResponse::from(&outcome);

    match format {
        OutputFormat::Human => match &outcome {
            IndexOutcome::Created { stats, .. } => {
                println!(
                    "{} '{}' into collection '{}'",
                    colors::success("Indexed"),
                    colors::file_path(&filename),
                    colors::collection(&response.collection)
                );
                println!(
                    "  {} chunks from {} characters in {}",
                    colors::number(&stats.chunks_created.to_string()),
                    colors::number(&stats.chars_extracted.to_string()),
                    colors::number(&format_duration(stats.duration_ms as f64 / 1000.0))
                );
            }
            IndexOutcome::AlreadyIndexed { .. } => {
                println!(
                    "{}: collection '{}' is now selected",
                    colors::warning(&response.message),
                    colors::collection(&response.collection)
                );
            }
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
