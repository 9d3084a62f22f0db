use crate::errors::Result;
use crate::fetcher::SitemapFetcher;
use crate::grouping::{subset_urls, GroupingPolicy};
use crate::parser::parse_sitemap;
use crate::storage::SitemapStore;
use crate::writer::render_sitemap;
use crate::{SubsetReport, SubsetRequest};

/// Runs one request through fetch, parse, subset, render and store.
pub struct SitemapGenerator {
    fetcher: SitemapFetcher,
    store: SitemapStore,
    policy: GroupingPolicy,
}

impl SitemapGenerator {
    pub fn new(fetcher: SitemapFetcher, store: SitemapStore, policy: GroupingPolicy) -> Self {
        Self {
            fetcher,
            store,
            policy,
        }
    }

    pub fn store(&self) -> &SitemapStore {
        &self.store
    }

    pub fn policy(&self) -> GroupingPolicy {
        self.policy
    }

    /// Nothing is written unless every step before the store succeeds.
    pub async fn generate(&self, request: &SubsetRequest) -> Result<SubsetReport> {
        let xml = self.fetcher.resolve(&request.input).await?;
        let urls = parse_sitemap(&xml)?;
        let subset = subset_urls(&urls, request.subset_size, self.policy)?;
        let document = render_sitemap(&subset.urls)?;
        let generated = self.store.save(document).await?;

        tracing::info!(
            id = %generated.id,
            policy = %self.policy,
            total_urls = subset.total_urls,
            subset_size = subset.subset_size(),
            "generated sitemap subset"
        );

        Ok(SubsetReport {
            total_urls: subset.total_urls,
            subset_size: subset.subset_size(),
            subset_urls: subset.urls,
            sitemap_id: generated.id,
        })
    }
}
