use std::time::Duration;

use reqwest::Client;

use crate::errors::{Result, SitemapError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the sitemap text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapInput {
    Remote(String),
    Inline(String),
}

impl SitemapInput {
    /// Prefers the URL when both are given. Blank values count as missing.
    pub fn from_parts(url: Option<&str>, content: Option<&str>) -> Result<Self> {
        let url = url.map(str::trim).filter(|u| !u.is_empty());
        let content = content.filter(|c| !c.trim().is_empty());
        match (url, content) {
            (Some(url), _) => Ok(SitemapInput::Remote(url.to_string())),
            (None, Some(content)) => Ok(SitemapInput::Inline(content.to_string())),
            (None, None) => Err(SitemapError::InputMissing),
        }
    }
}

pub struct SitemapFetcher {
    client: Client,
}

impl SitemapFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(SitemapError::Client)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Returns the raw XML text for `input`, fetching it when remote.
    pub async fn resolve(&self, input: &SitemapInput) -> Result<String> {
        match input {
            SitemapInput::Inline(content) => Ok(content.clone()),
            SitemapInput::Remote(url) => self.fetch(url).await,
        }
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let network = |source| SitemapError::NetworkFailure {
            url: url.to_string(),
            source,
        };

        tracing::info!(url, "fetching sitemap");
        let res = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(network)?;
        let body = res.text().await.map_err(network)?;
        tracing::debug!(url, bytes = body.len(), "fetched sitemap");
        Ok(body)
    }
}
