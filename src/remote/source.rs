//! Remote image source abstraction
//!
//! The cache never talks to the network directly. Everything goes through
//! this trait so the HTTP client can be swapped or faked.

use crate::error::PlateResult;
use async_trait::async_trait;
use std::fmt;

/// Status line of a metadata-only request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteStatus {
    /// HTTP status code
    pub code: u16,
}

impl RemoteStatus {
    pub fn new(code: u16) -> Self {
        Self { code }
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.code)
    }
}

/// Abstract remote source interface
///
/// Implementations must be cheap to share across tasks; the resolver holds
/// one behind an `Arc` for the lifetime of the process.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Metadata-only request (HEAD semantics)
    ///
    /// Returns the status for any completed exchange, including 4xx/5xx.
    /// Errors are reserved for transport failures.
    async fn head(&self, url: &str) -> PlateResult<RemoteStatus>;

    /// Fetch the full body of `url`
    ///
    /// Fails with `PlateError::Download` on transport failure or any
    /// non-success status.
    async fn download(&self, url: &str) -> PlateResult<Vec<u8>>;

    /// Human-readable source name for logs and status output
    fn name(&self) -> &'static str;
}
