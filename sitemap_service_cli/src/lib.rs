pub mod errors;
pub mod fetcher;
pub mod generator;
pub mod grouping;
pub mod logging;
pub mod parser;
pub mod storage;
pub mod utils;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use errors::{Result, SitemapError};
pub use fetcher::{SitemapFetcher, SitemapInput};
pub use generator::SitemapGenerator;
pub use grouping::{group_urls, subset_urls, GroupingPolicy, Subset, SubsetSize};
pub use parser::parse_sitemap;
pub use storage::{GeneratedSitemap, SitemapId, SitemapStore};
pub use writer::{render_sitemap, SITEMAP_NAMESPACE};

/// One absolute page URL taken from a sitemap's `<loc>`.
pub type SitemapEntry = String;

/// URLs sharing a structural key, in their original order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UrlGroup {
    pub key: String,
    pub urls: Vec<SitemapEntry>,
}

#[derive(Debug, Clone)]
pub struct SubsetRequest {
    pub input: SitemapInput,
    pub subset_size: SubsetSize,
}

impl SubsetRequest {
    /// Validates the subset size before the input, so a bad size never
    /// triggers a fetch.
    pub fn from_parts(url: Option<&str>, content: Option<&str>, subset_size: i64) -> Result<Self> {
        let subset_size = SubsetSize::try_from(subset_size)?;
        let input = SitemapInput::from_parts(url, content)?;
        Ok(Self { input, subset_size })
    }
}

/// Outcome of a successful generation, as reported to callers.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubsetReport {
    pub total_urls: usize,
    pub subset_urls: Vec<SitemapEntry>,
    pub subset_size: usize,
    pub sitemap_id: SitemapId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_rejects_bad_size_before_input() {
        let err = SubsetRequest::from_parts(None, None, 0).unwrap_err();
        assert!(matches!(err, SitemapError::UnsupportedSubsetSize(_)));

        let err = SubsetRequest::from_parts(None, None, 3).unwrap_err();
        assert!(matches!(err, SitemapError::InputMissing));
    }

    #[test]
    fn report_serializes_in_camel_case() {
        let report = SubsetReport {
            total_urls: 4,
            subset_urls: vec!["https://x.com/a".into()],
            subset_size: 1,
            sitemap_id: SitemapId::parse("1700000000000-abcd1234").unwrap(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totalUrls"], 4);
        assert_eq!(value["subsetSize"], 1);
        assert_eq!(value["subsetUrls"][0], "https://x.com/a");
        assert_eq!(value["sitemapId"], "1700000000000-abcd1234");
    }
}
