//! Validity probing
//!
//! A HEAD request before committing to a download, so dead links fail fast
//! and never reach the disk.

use crate::remote::RemoteSource;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Lightweight reachability check for remote images
#[derive(Clone)]
pub struct Prober {
    source: Arc<dyn RemoteSource>,
    timeout: Duration,
    enabled: bool,
}

impl Prober {
    /// Create a prober over `source` bounded by `timeout`
    pub fn new(source: Arc<dyn RemoteSource>, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            enabled: true,
        }
    }

    /// Skip the HEAD request entirely and report every URL as valid
    pub fn disabled(source: Arc<dyn RemoteSource>) -> Self {
        Self {
            source,
            timeout: Duration::ZERO,
            enabled: false,
        }
    }

    /// Whether probes are actually sent
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check whether `url` answers a HEAD request with a success status
    ///
    /// Never fails: transport errors, timeouts and non-2xx all map to `false`.
    pub async fn probe(&self, url: &str) -> bool {
        if !self.enabled {
            return true;
        }

        match tokio::time::timeout(self.timeout, self.source.head(url)).await {
            Ok(Ok(status)) if status.is_success() => {
                debug!(url, %status, "Probe ok");
                true
            }
            Ok(Ok(status)) => {
                debug!(url, %status, "Probe rejected");
                false
            }
            Ok(Err(e)) => {
                warn!(url, error = %e, retryable = e.is_retryable(), "Probe failed");
                false
            }
            Err(_) => {
                warn!(url, timeout_ms = self.timeout.as_millis() as u64, "Probe timed out");
                false
            }
        }
    }
}
