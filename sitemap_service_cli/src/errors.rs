use std::io;

use thiserror::Error;

/// Error type for every stage of sitemap subset generation and retrieval.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("no sitemap URL or content provided")]
    InputMissing,
    #[error("invalid sitemap format: {0}")]
    InvalidFormat(String),
    #[error("invalid URL format: {0}")]
    InvalidUrlFormat(String),
    #[error("unsupported subset size '{0}': expected a positive integer")]
    UnsupportedSubsetSize(String),
    #[error("failed to fetch sitemap from {url}")]
    NetworkFailure {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("sitemap '{0}' not found")]
    NotFound(String),
    #[error("failed to serialize sitemap: {0}")]
    Serialize(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SitemapError {
    /// True for failures caused by what the caller submitted rather than by
    /// the network or the local filesystem.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SitemapError::InputMissing
                | SitemapError::InvalidFormat(_)
                | SitemapError::InvalidUrlFormat(_)
                | SitemapError::UnsupportedSubsetSize(_)
        )
    }
}

pub type Result<T, E = SitemapError> = std::result::Result<T, E>;
