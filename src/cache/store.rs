//! Local image store
//!
//! Owns the cache directory on disk. Files are named from the cache key with
//! one fixed extension; bytes are stored exactly as downloaded.
//!
//! Writes land in a temporary sibling first and are renamed into place, so
//! `has()` never reports a half-written file.

use crate::cache::key::CacheKey;
use crate::error::{PlateError, PlateResult};
use crate::remote::RemoteSource;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// Suffix of in-progress downloads
const PART_SUFFIX: &str = ".part";

/// Format bytes as human-readable size (e.g., "1.5 MB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Disk usage of the cache directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreUsage {
    /// Number of cached images
    pub files: u64,
    /// Total size of cached images
    pub bytes: u64,
}

/// Naming and limits for files in the store
#[derive(Debug, Clone)]
pub struct StoreLayout {
    /// Cache root
    pub dir: PathBuf,
    /// Filename prefix (`img_`)
    pub prefix: String,
    /// Fixed extension (`jpg`)
    pub extension: String,
    /// Largest accepted body
    pub max_file_bytes: u64,
}

impl StoreLayout {
    /// Layout with the default naming scheme
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "img_".to_string(),
            extension: "jpg".to_string(),
            max_file_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Cache directory manager
#[derive(Clone)]
pub struct LocalStore {
    layout: StoreLayout,
    source: Arc<dyn RemoteSource>,
    download_timeout: Duration,
}

impl LocalStore {
    /// Create a store rooted at `layout.dir`, downloading through `source`
    pub fn new(
        layout: StoreLayout,
        source: Arc<dyn RemoteSource>,
        download_timeout: Duration,
    ) -> Self {
        Self {
            layout,
            source,
            download_timeout,
        }
    }

    /// Cache root directory
    pub fn dir(&self) -> &Path {
        &self.layout.dir
    }

    /// Final on-disk path for a key
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.layout
            .dir
            .join(key.file_name(&self.layout.prefix, &self.layout.extension))
    }

    /// Create the cache directory if it does not exist
    ///
    /// Safe to call from many resolutions at once.
    pub async fn ensure_directory(&self) -> PlateResult<()> {
        fs::create_dir_all(&self.layout.dir).await.map_err(|e| {
            PlateError::io(
                format!("creating cache directory {}", self.layout.dir.display()),
                e,
            )
        })
    }

    /// Whether a non-empty file for `key` exists
    pub async fn has(&self, key: &CacheKey) -> bool {
        match fs::metadata(self.path_for(key)).await {
            Ok(meta) => meta.is_file() && meta.len() > 0,
            Err(_) => false,
        }
    }

    /// Download `url` and store it under `key`, returning the final path
    pub async fn write(&self, key: &CacheKey, url: &str) -> PlateResult<PathBuf> {
        let bytes = match tokio::time::timeout(self.download_timeout, self.source.download(url))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(PlateError::download(
                    url,
                    format!("timed out after {}ms", self.download_timeout.as_millis()),
                ))
            }
        };

        if bytes.is_empty() {
            return Err(PlateError::download(url, "empty response body"));
        }
        if bytes.len() as u64 > self.layout.max_file_bytes {
            return Err(PlateError::download(
                url,
                format!(
                    "body of {} exceeds limit of {}",
                    format_bytes(bytes.len() as u64),
                    format_bytes(self.layout.max_file_bytes)
                ),
            ));
        }

        let final_path = self.path_for(key);
        let part_path = self.part_path(key);

        if let Err(e) = fs::write(&part_path, &bytes).await {
            self.discard(&part_path).await;
            return Err(PlateError::io(
                format!("writing {}", part_path.display()),
                e,
            ));
        }

        if let Err(e) = fs::rename(&part_path, &final_path).await {
            self.discard(&part_path).await;
            return Err(PlateError::io(
                format!("moving download into {}", final_path.display()),
                e,
            ));
        }

        debug!(url, key = %key, bytes = bytes.len(), "Stored image");
        Ok(final_path)
    }

    /// Delete the file for `key`; a missing file is not an error
    pub async fn remove(&self, key: &CacheKey) -> PlateResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = %key, "Removed cached image");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PlateError::io(format!("removing {}", path.display()), e)),
        }
    }

    /// Remove every cached image (and leftover partial downloads)
    ///
    /// Returns the number of images removed.
    pub async fn clear(&self) -> PlateResult<u32> {
        let mut removed = 0;
        for (path, is_part, _) in self.scan().await? {
            fs::remove_file(&path)
                .await
                .map_err(|e| PlateError::io(format!("removing {}", path.display()), e))?;
            if !is_part {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Count and size cached images
    pub async fn usage(&self) -> PlateResult<StoreUsage> {
        let mut usage = StoreUsage::default();
        for (_, is_part, len) in self.scan().await? {
            if !is_part {
                usage.files += 1;
                usage.bytes += len;
            }
        }
        Ok(usage)
    }

    /// List files owned by the store: (path, is_partial, length)
    async fn scan(&self) -> PlateResult<Vec<(PathBuf, bool, u64)>> {
        let mut entries = match fs::read_dir(&self.layout.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PlateError::io("reading cache directory", e)),
        };

        let suffix = format!(".{}", self.layout.extension);
        let mut owned = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PlateError::io("reading cache entry", e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_part = name.starts_with('.') && name.ends_with(PART_SUFFIX);
            let is_image = name.starts_with(&self.layout.prefix) && name.ends_with(&suffix);
            if !is_part && !is_image {
                continue;
            }

            let len = entry.metadata().await.map(|m| m.len()).unwrap_or(0);
            owned.push((entry.path(), is_part, len));
        }

        Ok(owned)
    }

    fn part_path(&self, key: &CacheKey) -> PathBuf {
        let name = key.file_name(&self.layout.prefix, &self.layout.extension);
        self.layout
            .dir
            .join(format!(".{}.{}{}", name, Uuid::new_v4().simple(), PART_SUFFIX))
    }

    async fn discard(&self, part_path: &Path) {
        if let Err(e) = fs::remove_file(part_path).await {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove partial download {}: {}", part_path.display(), e);
            }
        }
    }
}
