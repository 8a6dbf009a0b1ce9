//! Remote sources for image bytes
//!
//! - `HttpSource`: real HTTP via `ureq`
//! - `MemorySource`: canned responses, for tests and offline use

mod http;
mod memory;
mod source;

pub use http::HttpSource;
pub use memory::MemorySource;
pub use source::{RemoteSource, RemoteStatus};

use crate::config::{download_timeout, probe_timeout, Config};
use std::sync::Arc;

/// Create the remote source described by the configuration
pub fn create_source(config: &Config) -> Arc<dyn RemoteSource> {
    Arc::new(HttpSource::new(
        probe_timeout(config),
        download_timeout(config),
        config.http.user_agent.clone(),
        config.cache.max_file_bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_http_source() {
        let source = create_source(&Config::default());
        assert_eq!(source.name(), "http");
    }
}
