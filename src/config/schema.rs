//! Configuration schema for platecache
//!
//! Configuration is stored at `~/.config/platecache/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Image cache settings
    pub cache: CacheConfig,

    /// HTTP client settings
    pub http: HttpConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Image cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory override (defaults to the platform cache dir)
    pub dir: Option<PathBuf>,

    /// Filename prefix for cached images
    pub file_prefix: String,

    /// Extension used for every cached file, regardless of content type
    pub extension: String,

    /// What to render when an image cannot be fetched.
    /// Unset means the original remote URL is handed back.
    pub placeholder: Option<String>,

    /// Largest body accepted for a single image
    pub max_file_bytes: u64,

    /// Rewrite known CDN URLs to request a smaller variant
    pub optimize_urls: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_prefix: "img_".to_string(),
            extension: "jpg".to_string(),
            placeholder: None,
            max_file_bytes: 10 * 1024 * 1024,
            optimize_urls: false,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Send a HEAD request before downloading
    pub probe: bool,

    /// Timeout for the HEAD probe in milliseconds
    pub probe_timeout_ms: u64,

    /// Timeout for a full download in milliseconds
    pub download_timeout_ms: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            probe: true,
            probe_timeout_ms: 5_000,
            download_timeout_ms: 30_000,
            user_agent: format!("platecache/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
