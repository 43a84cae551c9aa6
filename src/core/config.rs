//! Configuration management for the passage service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{PassageError, Result};
use crate::core::naming::sanitize;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Chunks whose char length is <= this are dropped
    #[serde(default = "default_min_chunk_len")]
    pub min_chunk_len: usize,

    /// Extracted text shorter than this (in chars) is rejected as empty
    #[serde(default = "default_min_document_chars")]
    pub min_document_chars: usize,

    /// Maximum upload size in MB
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

/// Document extraction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Run OCR on PDFs whose text layer is too thin
    #[serde(default = "default_ocr_enabled")]
    pub ocr_enabled: bool,

    /// PDF text yield (chars) below which OCR is attempted
    #[serde(default = "default_ocr_min_chars")]
    pub ocr_min_chars: usize,

    /// Tesseract language code
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,

    /// Rasterisation resolution passed to pdftoppm
    #[serde(default = "default_ocr_dpi")]
    pub ocr_dpi: u32,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Nearest chunks per sub-query when the caller gives none
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Upper bound on caller-supplied k
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Neighbours added before each hit
    #[serde(default = "default_window_before")]
    pub window_before: u64,

    /// Neighbours added after each hit
    #[serde(default = "default_window_after")]
    pub window_after: u64,

    /// Maximum query string length
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per collection
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Store backend: "tantivy" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Collection searches run against until another is selected
    #[serde(default = "default_collection")]
    pub default_collection: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Limits configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Maximum concurrent indexing operations
    #[serde(default = "default_max_concurrent_indexes")]
    pub max_concurrent_indexes: usize,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,
}

/// Store backends accepted by `storage.backend`
pub const BACKENDS: &[&str] = &["tantivy", "memory"];

/// Upper bound on `window_before + window_after`
pub const MAX_WINDOW: u64 = 1000;

// Default value functions
fn default_min_chunk_len() -> usize {
    0
}

fn default_min_document_chars() -> usize {
    8
}

fn default_max_upload_mb() -> usize {
    50
}

fn default_ocr_enabled() -> bool {
    true
}

fn default_ocr_min_chars() -> usize {
    64
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_ocr_dpi() -> u32 {
    150
}

fn default_k() -> usize {
    10
}

fn default_max_k() -> usize {
    100
}

fn default_window_before() -> u64 {
    1
}

fn default_window_after() -> u64 {
    3
}

fn default_max_query_length() -> usize {
    2000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_backend() -> String {
    "tantivy".to_string()
}

fn default_collection() -> String {
    "alldocs".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6000
}

fn default_max_concurrent_indexes() -> usize {
    1
}

fn default_request_timeout() -> u64 {
    300
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            min_chunk_len: default_min_chunk_len(),
            min_document_chars: default_min_document_chars(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: default_ocr_enabled(),
            ocr_min_chars: default_ocr_min_chars(),
            ocr_language: default_ocr_language(),
            ocr_dpi: default_ocr_dpi(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            window_before: default_window_before(),
            window_after: default_window_after(),
            max_query_length: default_max_query_length(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: default_backend(),
            default_collection: default_collection(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_indexes: default_max_concurrent_indexes(),
            request_timeout_sec: default_request_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| PassageError::Config(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. PASSAGE_CONFIG env var
    /// 2. XDG config file (~/.config/passage/config.toml)
    /// 3. ./passage.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("PASSAGE_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("passage.toml").exists() {
                Self::from_file("passage.toml")?
            } else {
                Self::default()
            }
        };

        // Collections live under the XDG data directory unless configured
        if env::var("PASSAGE_DATA_DIR").is_err() && config.storage.data_dir == default_data_dir()
        {
            config.storage.data_dir = xdg.collections_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Indexing configuration
        if let Ok(min_len) = env::var("PASSAGE_MIN_CHUNK_LEN") {
            if let Ok(len) = min_len.parse() {
                self.indexing.min_chunk_len = len;
            }
        }
        if let Ok(min_chars) = env::var("PASSAGE_MIN_DOCUMENT_CHARS") {
            if let Ok(chars) = min_chars.parse() {
                self.indexing.min_document_chars = chars;
            }
        }
        if let Ok(max_upload) = env::var("PASSAGE_MAX_UPLOAD_MB") {
            if let Ok(mb) = max_upload.parse() {
                self.indexing.max_upload_mb = mb;
            }
        }

        // Extraction configuration
        if let Ok(ocr) = env::var("PASSAGE_OCR_ENABLED") {
            if let Ok(enabled) = ocr.parse() {
                self.extraction.ocr_enabled = enabled;
            }
        }

        // Search configuration
        if let Ok(default_k) = env::var("PASSAGE_DEFAULT_K") {
            if let Ok(k) = default_k.parse() {
                self.search.default_k = k;
            }
        }
        if let Ok(max_k) = env::var("PASSAGE_MAX_K") {
            if let Ok(k) = max_k.parse() {
                self.search.max_k = k;
            }
        }
        if let Ok(before) = env::var("PASSAGE_WINDOW_BEFORE") {
            if let Ok(n) = before.parse() {
                self.search.window_before = n;
            }
        }
        if let Ok(after) = env::var("PASSAGE_WINDOW_AFTER") {
            if let Ok(n) = after.parse() {
                self.search.window_after = n;
            }
        }
        if let Ok(max_query_len) = env::var("PASSAGE_MAX_QUERY_LENGTH") {
            if let Ok(len) = max_query_len.parse() {
                self.search.max_query_length = len;
            }
        }

        // Storage configuration
        if let Ok(data_dir) = env::var("PASSAGE_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir).join("collections");
        }
        if let Ok(backend) = env::var("PASSAGE_STORE_BACKEND") {
            self.storage.backend = backend;
        }
        if let Ok(name) = env::var("PASSAGE_DEFAULT_COLLECTION") {
            self.storage.default_collection = name;
        }

        // Server configuration
        if let Ok(host) = env::var("PASSAGE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PASSAGE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Limits configuration
        if let Ok(max_concurrent) = env::var("PASSAGE_MAX_CONCURRENT_INDEXES") {
            if let Ok(max) = max_concurrent.parse() {
                self.limits.max_concurrent_indexes = max;
            }
        }
        if let Ok(timeout) = env::var("PASSAGE_REQUEST_TIMEOUT_SEC") {
            if let Ok(t) = timeout.parse() {
                self.limits.request_timeout_sec = t;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.max_upload_mb == 0 {
            return Err(PassageError::Config(
                "Max upload size must be non-zero".to_string(),
            ));
        }

        if self.search.default_k == 0 {
            return Err(PassageError::Config(
                "Default k must be non-zero".to_string(),
            ));
        }

        if self.search.default_k > self.search.max_k {
            return Err(PassageError::Config(
                "Default k cannot exceed max k".to_string(),
            ));
        }

        if self.search.max_query_length == 0 {
            return Err(PassageError::Config(
                "Max query length must be non-zero".to_string(),
            ));
        }

        let window = self
            .search
            .window_before
            .saturating_add(self.search.window_after);
        if window > MAX_WINDOW {
            return Err(PassageError::Config(format!(
                "Window before + after is {window}, must not exceed {MAX_WINDOW}"
            )));
        }

        if !BACKENDS.contains(&self.storage.backend.as_str()) {
            return Err(PassageError::Config(format!(
                "Unknown store backend '{}' (expected one of: {})",
                self.storage.backend,
                BACKENDS.join(", ")
            )));
        }

        // The default name is used verbatim as a collection identifier
        match sanitize(&self.storage.default_collection) {
            Ok(clean) if clean == self.storage.default_collection => {}
            _ => {
                return Err(PassageError::Config(format!(
                    "Default collection '{}' is not a valid collection name",
                    self.storage.default_collection
                )));
            }
        }

        if self.limits.max_concurrent_indexes == 0 {
            return Err(PassageError::Config(
                "Max concurrent indexes must be non-zero".to_string(),
            ));
        }

        if self.limits.request_timeout_sec == 0 {
            return Err(PassageError::Config(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Maximum upload size in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.indexing.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Min chunk length: {} chars", self.indexing.min_chunk_len);
        tracing::info!(
            "  Min document length: {} chars",
            self.indexing.min_document_chars
        );
        tracing::info!("  Max upload: {} MB", self.indexing.max_upload_mb);
        tracing::info!(
            "  OCR fallback: {} (below {} chars, lang {}, {} dpi)",
            self.extraction.ocr_enabled,
            self.extraction.ocr_min_chars,
            self.extraction.ocr_language,
            self.extraction.ocr_dpi
        );
        tracing::info!("  Default k: {}", self.search.default_k);
        tracing::info!("  Max k: {}", self.search.max_k);
        tracing::info!(
            "  Window: {} before, {} after",
            self.search.window_before,
            self.search.window_after
        );
        tracing::info!("  Max query length: {}", self.search.max_query_length);
        tracing::info!("  Data dir: {:?}", self.storage.data_dir);
        tracing::info!("  Backend: {}", self.storage.backend);
        tracing::info!("  Default collection: {}", self.storage.default_collection);
        tracing::info!(
            "  Max concurrent indexes: {}",
            self.limits.max_concurrent_indexes
        );
        tracing::info!("  Request timeout: {}s", self.limits.request_timeout_sec);
    }
}
