//! Remote retrieval of image references over HTTP(S).

use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::{ConfigError, PipelineError};

/// Bytes of a remote resource plus the URL they were finally served from.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub bytes: Vec<u8>,
    /// URL after redirects; the name hint is taken from its path
    pub final_url: Url,
}

/// Retrieves remote resources.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the pipeline holds a `Box<dyn RemoteFetcher>`).
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, PipelineError>;
}

/// reqwest-backed fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
    max_bytes: u64,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, PipelineError> {
        let failure = |message: String, status_code: Option<u16>| PipelineError::FetchFailure {
            url: url.to_string(),
            message,
            status_code,
        };

        let mut resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| failure(format!("request failed: {e}"), None))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(failure(format!("HTTP {status}"), Some(status.as_u16())));
        }

        let too_large = |size: u64| {
            failure(
                format!("body of {size} bytes exceeds limit of {} bytes", self.max_bytes),
                None,
            )
        };
        if let Some(len) = resp.content_length().filter(|&len| len > self.max_bytes) {
            return Err(too_large(len));
        }

        let final_url = resp.url().clone();
        let mut bytes = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| failure(format!("failed to read body: {e}"), None))?
        {
            let size = (bytes.len() + chunk.len()) as u64;
            if size > self.max_bytes {
                return Err(too_large(size));
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!("Fetched {} bytes from {}", bytes.len(), final_url);
        Ok(FetchedResource { bytes, final_url })
    }
}
