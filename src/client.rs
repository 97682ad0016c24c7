//! dblp HTTP query client.
//!
//! [`Fetcher`] is the transport seam: [`HttpFetcher`] talks to the network
//! with reqwest, tests substitute an in-memory stub. [`DblpClient`] builds the
//! URLs, retries retryable failures with exponential backoff and parses the
//! search API responses.

use crate::config::PipelineConfig;
use crate::error::{DblpError, Result};
use crate::parser::{parse_search_page, SearchPage};
use crate::urls;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// User agent string for requests
const USER_AGENT: &str = "dblp-venues/0.1 (publication count bookkeeping)";

/// Something that can GET a URL and return the body.
pub trait Fetcher {
    fn get(&self, url: &Url) -> impl Future<Output = Result<String>> + Send;
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: reqwest::Client,
    /// Upper bound of the random pause before each request, in ms
    max_jitter_ms: u64,
}

impl HttpFetcher {
    /// Build a fetcher. `timeout` of `None` lets requests wait indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| DblpError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_jitter_ms: 500,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(config.timeout_secs.map(Duration::from_secs))
    }
}

impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<String> {
        // Small random pause to stay polite towards dblp
        if self.max_jitter_ms > 0 {
            let delay = rand::random::<u64>() % self.max_jitter_ms;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DblpError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| classify(e, url))
    }
}

fn classify(e: reqwest::Error, url: &Url) -> DblpError {
    if e.is_timeout() {
        DblpError::Timeout(url.to_string())
    } else {
        DblpError::Network(e)
    }
}

/// Exponential backoff: `base * 2^attempt`
pub fn backoff_duration(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Client for the dblp search API and journal pages.
pub struct DblpClient<F> {
    fetcher: F,
    base_url: String,
    page_size: usize,
    max_retries: u32,
    backoff_base: Duration,
}

impl<F: Fetcher> DblpClient<F> {
    pub fn new(fetcher: F, config: &PipelineConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.clone(),
            page_size: config.page_size,
            max_retries: config.max_retries,
            backoff_base: Duration::from_secs(1),
        }
    }

    /// Override the first retry delay (doubles on every further attempt).
    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Run one search query page starting at `first_hit`.
    pub async fn search(&self, query: &str, first_hit: usize) -> Result<SearchPage> {
        let url = urls::search_url(&self.base_url, query, self.page_size, first_hit)?;
        let body = self.get_with_retry(&url).await?;
        parse_search_page(&body)
    }

    /// Fetch the full record page of one journal volume.
    pub async fn volume(&self, code: &str, volume: u32) -> Result<SearchPage> {
        let url = urls::journal_volume_url(&self.base_url, code, volume, self.page_size)?;
        let body = self.get_with_retry(&url).await?;
        parse_search_page(&body)
    }

    /// Fetch the table-of-contents HTML of a journal.
    pub async fn toc(&self, code: &str) -> Result<String> {
        let url = urls::journal_toc_url(&self.base_url, code)?;
        self.get_with_retry(&url).await
    }

    async fn get_with_retry(&self, url: &Url) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            debug!(url = %url, attempt, "GET");
            match self.fetcher.get(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.max_retries && e.is_retryable() => {
                    attempt += 1;
                    let backoff = backoff_duration(self.backoff_base, attempt - 1);
                    warn!(
                        url = %url,
                        attempt,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Retryable failure, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
