//! Config command - show current configuration

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show resolved XDG paths
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub config: &'a Config,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsInfo>,
}

/// Resolved locations
#[derive(Debug, Serialize)]
pub struct PathsInfo {
    pub config_file: String,
    pub active_collection_file: String,
    pub ocr_cache_dir: String,
}

impl PathsInfo {
    fn from_xdg(xdg: &XdgDirs) -> Self {
        Self {
            config_file: xdg.config_file().to_string_lossy().into_owned(),
            active_collection_file: xdg.active_collection_file().to_string_lossy().into_owned(),
            ocr_cache_dir: xdg.ocr_cache_dir().to_string_lossy().into_owned(),
        }
    }
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    services: &Services,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse {
        config: services.config.as_ref(),
        paths: args.all.then(|| PathsInfo::from_xdg(xdg)),
    };

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label("Configuration:"));
            print!("{}", toml::to_string_pretty(response.config)?);
            if let Some(paths) = &response.paths {
                println!();
                println!("{}", colors::label("Paths:"));
                println!("  config_file: {}", colors::file_path(&paths.config_file));
                println!(
                    "  active_collection_file: {}",
                    colors::file_path(&paths.active_collection_file)
                );
                println!("  ocr_cache_dir: {}", colors::file_path(&paths.ocr_cache_dir));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
