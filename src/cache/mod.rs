//! On-device image cache
//!
//! Maps remote image URLs to local files, downloading each at most once and
//! falling back to a placeholder (or the original URL) when an image cannot
//! be fetched.
//!
//! # Entry States
//!
//! | State | Meaning | Next |
//! |-------|---------|------|
//! | Unresolved | Never resolved, or refreshed | Ready on disk hit, else Probing |
//! | Probing | HEAD in flight | Downloading or Invalid |
//! | Downloading | GET in flight | Ready or Invalid |
//! | Ready | Served from disk | Unresolved on invalidate |
//! | Invalid | Attempt failed, fallback returned | Unresolved (not remembered) |
//!
//! There is no time-based expiry. Entries are refreshed only by
//! `invalidate`, `invalidate_all` or `clear`.

pub mod entry;
pub mod key;
pub mod optimize;
pub mod probe;
mod refresh;
pub mod resolver;
pub mod store;

pub use entry::{CacheEntry, EntryState, Resolution};
pub use key::{derive_key, CacheKey};
pub use optimize::optimize_uri;
pub use probe::Prober;
pub use resolver::{CacheResolver, ResolverOptions};
pub use store::{format_bytes, LocalStore, StoreLayout, StoreUsage};
