//! CLI test helpers
//!
//! The CLI persists the selected collection, so these routers carry a
//! state file inside the test's temporary directory.

use passage::core::config::Config;
use passage::core::services::Services;
use passage::router::CollectionRouter;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Everything a CLI command needs, rooted in one temp dir
pub struct CliFixture {
    pub services: Arc<Services>,
    pub router: CollectionRouter,
    pub state_file: PathBuf,
    pub temp: TempDir,
}

impl CliFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut config = Config::default();
        config.storage.data_dir = temp.path().join("collections");

        let services = Arc::new(Services::new(config).expect("Failed to open store"));
        let state_file = temp.path().join("state").join("active_collection");
        let router = CollectionRouter::with_state_file(Arc::clone(&services), state_file.clone());

        Self {
            services,
            router,
            state_file,
            temp,
        }
    }

    /// A fresh router over the same store, as the next CLI invocation sees it
    pub fn next_invocation(&self) -> CollectionRouter {
        CollectionRouter::with_state_file(Arc::clone(&self.services), self.state_file.clone())
    }
}
