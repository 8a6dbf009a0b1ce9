//! Error types for platecache
//!
//! All modules use `PlateResult<T>` as their return type. The resolver
//! converts every variant below into a fallback result, so none of these
//! reach a renderer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for platecache operations
pub type PlateResult<T> = Result<T, PlateError>;

/// All errors that can occur in platecache
#[derive(Error, Debug)]
pub enum PlateError {
    // Input errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Network errors
    #[error("Probe failed for {url}: {reason}")]
    ProbeFailure { url: String, reason: String },

    #[error("Download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    // Filesystem errors
    #[error("Filesystem error: {context}")]
    Filesystem {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlateError {
    /// Create a filesystem error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Filesystem {
            context: context.into(),
            source,
        }
    }

    /// Create a download error
    pub fn download(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a probe error
    pub fn probe(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProbeFailure {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is retryable
    ///
    /// Remote availability can change between attempts; bad input and
    /// bad config cannot.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProbeFailure { .. } | Self::Download { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument(_) => Some("Pass a non-empty image URL"),
            Self::ConfigInvalid { .. } => Some("Run: platecache config init --force"),
            Self::Filesystem { .. } => Some("Check permissions on the cache directory"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlateError::download("https://cdn.example/a.jpg", "HTTP 404");
        assert_eq!(
            err.to_string(),
            "Download failed for https://cdn.example/a.jpg: HTTP 404"
        );
    }

    #[test]
    fn error_hint() {
        let err = PlateError::InvalidArgument("empty url".to_string());
        assert_eq!(err.hint(), Some("Pass a non-empty image URL"));
        assert_eq!(PlateError::Internal("x".to_string()).hint(), None);
    }

    #[test]
    fn error_retryable() {
        assert!(PlateError::probe("u", "refused").is_retryable());
        assert!(PlateError::download("u", "timed out after 10ms").is_retryable());
        assert!(!PlateError::InvalidArgument("".to_string()).is_retryable());
    }
}
