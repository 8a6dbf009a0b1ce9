//! Cache entry state
//!
//! Tracks where each remote URL is in its lifecycle and what the resolver
//! hands back to the renderer.

use crate::cache::key::CacheKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Lifecycle state of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    /// Not yet resolved (or discarded by a refresh)
    Unresolved,
    /// HEAD check in flight
    Probing,
    /// Full download in flight
    Downloading,
    /// File on disk, served from cache
    Ready,
    /// Last attempt failed; the next resolve starts over
    Invalid,
}

impl EntryState {
    /// Whether a probe or download is running for this entry
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Probing | Self::Downloading)
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unresolved => "unresolved",
            Self::Probing => "probing",
            Self::Downloading => "downloading",
            Self::Ready => "ready",
            Self::Invalid => "invalid",
        };
        write!(f, "{}", name)
    }
}

/// A remote URL and its local materialization
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The remote URL this entry represents
    pub source_url: String,
    /// Key derived from `source_url`
    pub cache_key: CacheKey,
    /// Local file, once downloaded
    pub local_path: Option<PathBuf>,
    /// Current lifecycle state
    pub state: EntryState,
    /// When the entry last became ready
    pub last_validated_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Create an unresolved entry
    pub fn new(source_url: impl Into<String>, cache_key: CacheKey) -> Self {
        Self {
            source_url: source_url.into(),
            cache_key,
            local_path: None,
            state: EntryState::Unresolved,
            last_validated_at: None,
        }
    }

    /// Mark the entry ready at `local_path`
    pub fn mark_ready(&mut self, local_path: PathBuf) {
        self.local_path = Some(local_path);
        self.state = EntryState::Ready;
        self.last_validated_at = Some(Utc::now());
    }

    /// Result to hand back for a ready entry, if it is ready
    pub fn resolution(&self) -> Option<Resolution> {
        match (&self.state, &self.local_path) {
            (EntryState::Ready, Some(path)) => Some(Resolution::cached(path)),
            _ => None,
        }
    }
}

/// What the renderer should display for a URL right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Local path, remote URL, or placeholder
    pub display_uri: String,
    /// Whether `display_uri` points into the cache
    pub from_cache: bool,
}

impl Resolution {
    /// A cache hit
    pub fn cached(path: &std::path::Path) -> Self {
        Self {
            display_uri: path.display().to_string(),
            from_cache: true,
        }
    }

    /// A fallback (placeholder or the original URL)
    pub fn fallback(uri: impl Into<String>) -> Self {
        Self {
            display_uri: uri.into(),
            from_cache: false,
        }
    }
}
