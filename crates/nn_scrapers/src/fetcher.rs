//! Page retrieval with a fixed-delay retry loop.
//!
//! Homepages and detail pages go through [`Fetcher::fetch`], which keeps
//! retrying transport failures until it gets a response, runs out of
//! configured attempts, or the run is cancelled. Images use
//! [`Fetcher::get_once`] and are never retried.

use async_trait::async_trait;
use nn_core::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(15);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("nn/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single HTTP GET. Errors mean the request never produced a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResponse>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(FetchResponse { status, body })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_RETRY_DELAY,
            max_attempts: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy, cancel: CancellationToken) -> Self {
        Self {
            transport,
            policy,
            cancel,
        }
    }

    /// Fetcher backed by a real HTTP client.
    pub fn http(policy: RetryPolicy, cancel: CancellationToken) -> Result<Self> {
        let transport = HttpTransport::new(policy.request_timeout)?;
        Ok(Self::new(Arc::new(transport), policy, cancel))
    }

    /// One request, no retry. Returns `Error::Cancelled` as soon as the run is cancelled.
    pub async fn get_once(&self, url: &str) -> Result<FetchResponse> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            response = self.transport.get(url) => response,
        }
    }

    /// Retrieve a page body, retrying transport failures after `policy.delay`.
    ///
    /// Non-2xx responses are returned as-is; the caller's parser decides
    /// what an error page means.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.get_once(url).await {
                Ok(response) => {
                    if !response.is_success() {
                        warn!(%url, status = response.status, "Fetched page with non-success status");
                    }
                    debug!(%url, attempts, bytes = response.body.len(), "Fetched page");
                    return Ok(response.body);
                }
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => {
                    if self.policy.max_attempts.is_some_and(|max| attempts >= max) {
                        return Err(Error::RetriesExhausted {
                            url: url.to_string(),
                            attempts,
                        });
                    }
                    warn!(
                        %url,
                        attempt = attempts,
                        error = %e,
                        "Connection failed, retrying in {}s",
                        self.policy.delay.as_secs()
                    );
                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                        _ = tokio::time::sleep(self.policy.delay) => {}
                    }
                }
            }
        }
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let body = self.fetch(url).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
