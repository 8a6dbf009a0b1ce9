//! In-memory remote source
//!
//! Serves canned responses from a table and counts every call. Used by the
//! test suites and handy for driving the cache without a network.

use crate::error::{PlateError, PlateResult};
use crate::remote::source::{RemoteSource, RemoteStatus};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Route {
    Body { status: u16, bytes: Vec<u8> },
    Unreachable,
}

/// Remote source serving fixed responses
#[derive(Debug, Default)]
pub struct MemorySource {
    routes: Mutex<HashMap<String, Route>>,
    latency: Option<Duration>,
    heads: AtomicUsize,
    downloads: AtomicUsize,
    active_downloads: AtomicUsize,
    peak_downloads: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call, so concurrent callers overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Serve `bytes` with status 200
    pub fn serve(&self, url: &str, bytes: impl Into<Vec<u8>>) {
        self.serve_status(url, 200, bytes);
    }

    /// Serve `bytes` with an arbitrary status
    pub fn serve_status(&self, url: &str, status: u16, bytes: impl Into<Vec<u8>>) {
        self.routes.lock().insert(
            url.to_string(),
            Route::Body {
                status,
                bytes: bytes.into(),
            },
        );
    }

    /// Fail every request to `url` at the transport level
    pub fn unreachable(&self, url: &str) {
        self.routes.lock().insert(url.to_string(), Route::Unreachable);
    }

    /// Number of HEAD requests seen
    pub fn head_count(&self) -> usize {
        self.heads.load(Ordering::SeqCst)
    }

    /// Number of downloads seen
    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    /// Most downloads that were ever running at the same time
    pub fn peak_concurrent_downloads(&self) -> usize {
        self.peak_downloads.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn route(&self, url: &str) -> Option<Route> {
        self.routes.lock().get(url).cloned()
    }
}

#[async_trait]
impl RemoteSource for MemorySource {
    async fn head(&self, url: &str) -> PlateResult<RemoteStatus> {
        self.heads.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        match self.route(url) {
            Some(Route::Body { status, .. }) => Ok(RemoteStatus::new(status)),
            Some(Route::Unreachable) => Err(PlateError::probe(url, "connection refused")),
            None => Ok(RemoteStatus::new(404)),
        }
    }

    async fn download(&self, url: &str) -> PlateResult<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let running = self.active_downloads.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_downloads.fetch_max(running, Ordering::SeqCst);
        self.pause().await;
        self.active_downloads.fetch_sub(1, Ordering::SeqCst);

        match self.route(url) {
            Some(Route::Body { status, bytes }) => {
                let status = RemoteStatus::new(status);
                if status.is_success() {
                    Ok(bytes)
                } else {
                    Err(PlateError::download(url, status.to_string()))
                }
            }
            Some(Route::Unreachable) => Err(PlateError::download(url, "connection refused")),
            None => Err(PlateError::download(url, RemoteStatus::new(404).to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_and_counts() {
        let source = MemorySource::new();
        source.serve("https://cdn.example/a.jpg", b"jpeg".to_vec());

        let status = source.head("https://cdn.example/a.jpg").await.unwrap();
        assert!(status.is_success());
        let body = source.download("https://cdn.example/a.jpg").await.unwrap();
        assert_eq!(body, b"jpeg");

        assert_eq!(source.head_count(), 1);
        assert_eq!(source.download_count(), 1);
    }

    #[tokio::test]
    async fn tracks_overlapping_downloads() {
        let source = MemorySource::new().with_latency(Duration::from_millis(30));
        source.serve("https://cdn.example/a.jpg", b"a".to_vec());
        source.serve("https://cdn.example/b.jpg", b"b".to_vec());

        let (a, b) = tokio::join!(
            source.download("https://cdn.example/a.jpg"),
            source.download("https://cdn.example/b.jpg")
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(source.peak_concurrent_downloads(), 2);

        source.download("https://cdn.example/a.jpg").await.unwrap();
        assert_eq!(source.peak_concurrent_downloads(), 2);
    }

    #[tokio::test]
    async fn unknown_url_is_not_found() {
        let source = MemorySource::new();
        let status = source.head("https://cdn.example/missing.jpg").await.unwrap();
        assert_eq!(status.code, 404);
        assert!(source.download("https://cdn.example/missing.jpg").await.is_err());
    }

    #[tokio::test]
    async fn unreachable_errors() {
        let source = MemorySource::new();
        source.unreachable("https://down.example/a.jpg");
        assert!(source.head("https://down.example/a.jpg").await.is_err());
        assert!(source.download("https://down.example/a.jpg").await.is_err());
    }
}
