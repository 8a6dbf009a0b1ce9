//! HTTP remote source backed by `ureq`
//!
//! `ureq` is blocking, so every request runs on the blocking pool via
//! `spawn_blocking`. HEAD and GET carry their own global timeouts so a
//! blocking thread never outlives the deadline the caller gave up at.

use crate::error::{PlateError, PlateResult};
use crate::remote::source::{RemoteSource, RemoteStatus};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Remote source that performs real HTTP requests
#[derive(Clone)]
pub struct HttpSource {
    agent: Agent,
    head_timeout: Duration,
    user_agent: String,
    max_body_bytes: u64,
}

impl HttpSource {
    /// Create a new HTTP source
    ///
    /// `head_timeout` bounds metadata requests, `download_timeout` full GETs.
    pub fn new(
        head_timeout: Duration,
        download_timeout: Duration,
        user_agent: impl Into<String>,
        max_body_bytes: u64,
    ) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(download_timeout))
            .http_status_as_error(false)
            .build();

        Self {
            agent: config.into(),
            head_timeout,
            user_agent: user_agent.into(),
            max_body_bytes,
        }
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn head(&self, url: &str) -> PlateResult<RemoteStatus> {
        let agent = self.agent.clone();
        let user_agent = self.user_agent.clone();
        let timeout = self.head_timeout;
        let target = url.to_string();

        let result = tokio::task::spawn_blocking(move || {
            agent
                .head(target.as_str())
                .header("User-Agent", user_agent.as_str())
                .config()
                .timeout_global(Some(timeout))
                .build()
                .call()
                .map(|response| response.status().as_u16())
        })
        .await
        .map_err(|e| PlateError::Internal(format!("HEAD task failed: {}", e)))?;

        let code = result.map_err(|e| PlateError::probe(url, e.to_string()))?;
        debug!(url, code, "HEAD completed");
        Ok(RemoteStatus::new(code))
    }

    async fn download(&self, url: &str) -> PlateResult<Vec<u8>> {
        let agent = self.agent.clone();
        let user_agent = self.user_agent.clone();
        let limit = self.max_body_bytes;
        let target = url.to_string();

        let result = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, String> {
            let mut response = agent
                .get(target.as_str())
                .header("User-Agent", user_agent.as_str())
                .call()
                .map_err(|e| e.to_string())?;

            let status = RemoteStatus::new(response.status().as_u16());
            if !status.is_success() {
                return Err(status.to_string());
            }

            response
                .body_mut()
                .with_config()
                .limit(limit)
                .read_to_vec()
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| PlateError::Internal(format!("download task failed: {}", e)))?;

        let bytes = result.map_err(|reason| PlateError::download(url, reason))?;
        debug!(url, bytes = bytes.len(), "GET completed");
        Ok(bytes)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
