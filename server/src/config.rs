use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use sitemap_service_cli::{GroupingPolicy, SitemapStore};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Server settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `SITEMAP_DIR`: where generated sitemaps are written and served from.
    pub sitemap_dir: PathBuf,
    /// `SITEMAP_GROUPING`: `prefix` or `first-segment`.
    pub grouping: GroupingPolicy,
    /// `CLIENT_URL`: origin allowed by CORS, if any.
    pub client_url: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address such as 127.0.0.1:3000")?;

        let sitemap_dir = lookup("SITEMAP_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(SitemapStore::default_dir);

        let grouping = match lookup("SITEMAP_GROUPING") {
            Some(raw) => raw
                .parse::<GroupingPolicy>()
                .map_err(|e| anyhow!(e))
                .context("invalid SITEMAP_GROUPING")?,
            None => GroupingPolicy::default(),
        };

        let client_url = lookup("CLIENT_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            bind_addr,
            sitemap_dir,
            grouping,
            client_url,
        })
    }
}
