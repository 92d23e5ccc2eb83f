//! Page fetching
//!
//! The crawl loop only talks to the `PageFetcher` trait. `HttpPageFetcher` is
//! the production implementation: one reqwest client acquired for the whole
//! run and released by `close()`.

use crate::config::{Config, UserAgentConfig};
use crate::{HarvestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Content of a fetched catalog page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Final URL after redirects, used to resolve relative links
    pub url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Page body
    pub html: String,
}

impl RenderedPage {
    /// Parses the body into a queryable document
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Capability to fetch rendered catalog pages
///
/// A fetcher is acquired once per run. `close()` releases it and must be
/// safe to call more than once.
#[async_trait]
pub trait PageFetcher: Send {
    /// Fetches the page at `url`
    async fn fetch(&mut self, url: &Url) -> Result<RenderedPage>;

    /// Waits until the last fetched page is considered fully loaded
    async fn settle(&mut self) -> Result<()>;

    /// Releases the underlying session
    async fn close(&mut self) -> Result<()>;
}

/// Builds an HTTP client with proper configuration
pub fn build_http_client(config: &UserAgentConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over plain HTTP
///
/// Any HTTP response is returned as a page, whatever its status. Only
/// transport failures (connection, timeout, unreadable body) are errors.
/// The body is complete once the response has been read, so `settle()` only
/// waits out the configured quiescence window.
#[derive(Debug)]
pub struct HttpPageFetcher {
    client: Option<Client>,
    settle_window: Duration,
}

impl HttpPageFetcher {
    /// Creates a fetcher from the harvester configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::with_client(
            client,
            Duration::from_millis(config.catalog.settle_ms),
        ))
    }

    pub fn with_client(client: Client, settle_window: Duration) -> Self {
        Self {
            client: Some(client),
            settle_window,
        }
    }

    /// Returns true once `close()` has been called
    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    fn client(&self) -> Result<&Client> {
        self.client.as_ref().ok_or(HarvestError::FetcherClosed)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&mut self, url: &Url) -> Result<RenderedPage> {
        let response = self
            .client()?
            .get(url.clone())
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })?;

        // Error pages are still pages: the listing check decides what they mean
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP {} for {}", status.as_u16(), url);
        }

        let final_url = response.url().clone();
        if final_url != *url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        let html = response.text().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(RenderedPage {
            url: final_url,
            status_code: status.as_u16(),
            html,
        })
    }

    async fn settle(&mut self) -> Result<()> {
        self.client()?;
        if !self.settle_window.is_zero() {
            tokio::time::sleep(self.settle_window).await;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if !self.is_closed() {
            self.client = None;
            tracing::debug!("Page fetcher released");
        }
        Ok(())
    }
}
