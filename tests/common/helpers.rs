// Test helper functions

use passage::core::config::Config;
use passage::core::services::Services;
use tempfile::TempDir;

/// Services over a Tantivy store in a temporary directory
///
/// Keep the returned TempDir alive for the duration of the test.
#[allow(dead_code)]
pub fn create_test_services() -> (Services, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.storage.data_dir = temp_dir.path().join("collections");

    let services = Services::new(config).expect("Failed to open store");
    (services, temp_dir)
}
