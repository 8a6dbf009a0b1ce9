//! platecache - on-device image cache for meal photos
//!
//! Resolves remote image URLs to local files, coalescing concurrent
//! downloads and falling back to a placeholder for dead links.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod remote;
pub mod ui;

pub use cache::{CacheResolver, Resolution};
pub use error::{PlateError, PlateResult};
