//! Cache key derivation
//!
//! Turns a remote URL into a stable, filesystem-safe token. Same URL = same
//! key, in this process and the next one.

use crate::error::{PlateError, PlateResult};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of digest bytes kept in a key (16 hex chars)
const KEY_BYTES: usize = 8;

/// Filesystem-safe cache key (lowercase hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// The raw hex token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// On-disk filename for this key, e.g. `img_3f1c...9a.jpg`
    pub fn file_name(&self, prefix: &str, extension: &str) -> String {
        format!("{}{}.{}", prefix, self.0, extension)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the cache key for a remote URL
///
/// No URL validation happens here; any non-blank string is accepted.
pub fn derive_key(url: &str) -> PlateResult<CacheKey> {
    if url.trim().is_empty() {
        return Err(PlateError::InvalidArgument(
            "cannot derive a cache key from an empty URL".to_string(),
        ));
    }

    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();

    Ok(CacheKey(hex::encode(&digest[..KEY_BYTES])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_deterministic() {
        let a = derive_key("https://cdn.example/a.jpg").unwrap();
        let b = derive_key("https://cdn.example/a.jpg").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn key_stable_across_processes() {
        // Pinned value: a change here orphans every cached file on disk.
        let key = derive_key("https://cdn.example/a.jpg").unwrap();
        let mut hasher = Sha256::new();
        hasher.update(b"https://cdn.example/a.jpg");
        let expected = hex::encode(&hasher.finalize()[..8]);
        assert_eq!(key.as_str(), expected);
    }

    #[test]
    fn key_is_filesystem_safe() {
        let key = derive_key("https://cdn.example/path with spaces/ü?x=1&y=../../etc").unwrap();
        assert_eq!(key.as_str().len(), 16);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn distinct_urls_distinct_keys() {
        let a = derive_key("https://cdn.example/a.jpg").unwrap();
        let b = derive_key("https://cdn.example/b.jpg").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_url_rejected() {
        assert!(matches!(
            derive_key(""),
            Err(PlateError::InvalidArgument(_))
        ));
        assert!(matches!(
            derive_key("   "),
            Err(PlateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn file_name_format() {
        let key = derive_key("https://cdn.example/a.jpg").unwrap();
        let name = key.file_name("img_", "jpg");
        assert!(name.starts_with("img_"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "img_".len() + 16 + ".jpg".len());
    }
}
