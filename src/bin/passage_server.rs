//! passage HTTP server entry point
//!
//! Serves the REST API for indexing documents and searching the
//! active collection. Set `PASSAGE_LOG_FORMAT=json` for JSON logs.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use passage::core::config::Config;
use passage::core::services::Services;
use passage::core::xdg::XdgDirs;
use passage::http::{build_router, AppState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "passage=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("PASSAGE_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    tracing::info!("Starting passage server");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    xdg.log_paths();
    xdg.ensure_dirs_exist()?;

    // Load configuration
    let config = Config::load_with_xdg(&xdg)?;
    config.log_config();

    // Create shared services
    let services = Arc::new(Services::new(config.clone())?);
    let state = AppState::new(services);

    // Searches start at the default collection, so make sure it exists
    state.router.ensure_default()?;

    let app = build_router(state);

    // Bind to address and start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Service ready - Health check at http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
