//! URL grouping and per-group subsetting.
//!
//! Pure list operations: the same URLs, subset size and policy always yield
//! the same groups and the same subset.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use url::Url;

use crate::errors::{Result, SitemapError};
use crate::{SitemapEntry, UrlGroup};

/// Key reserved for URLs whose path has no segments under [`GroupingPolicy::FirstSegment`].
pub const ROOT_GROUP_KEY: &str = "/";

/// How a URL is mapped to its structural group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum GroupingPolicy {
    /// Everything before the last `/`, so sibling pages share a group.
    #[default]
    Prefix,
    /// Only the first non-empty path segment, e.g. `/blog`.
    FirstSegment,
}

impl GroupingPolicy {
    pub fn key_for(self, url: &str) -> Result<String> {
        match self {
            GroupingPolicy::Prefix => Ok(match url.rfind('/') {
                Some(idx) => url[..idx].to_string(),
                None => String::new(),
            }),
            GroupingPolicy::FirstSegment => {
                let parsed = Url::parse(url)
                    .map_err(|e| SitemapError::InvalidUrlFormat(format!("{}: {}", url, e)))?;
                let first = parsed
                    .path_segments()
                    .and_then(|mut segments| segments.find(|s| !s.is_empty()));
                Ok(match first {
                    Some(segment) => format!("/{}", segment),
                    None => ROOT_GROUP_KEY.to_string(),
                })
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupingPolicy::Prefix => "prefix",
            GroupingPolicy::FirstSegment => "first-segment",
        }
    }
}

impl fmt::Display for GroupingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingPolicy {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "prefix" => Ok(GroupingPolicy::Prefix),
            "first-segment" | "first_segment" => Ok(GroupingPolicy::FirstSegment),
            other => Err(format!(
                "Invalid grouping policy: {} (expected 'prefix' or 'first-segment')",
                other
            )),
        }
    }
}

/// Maximum number of URLs kept from each group. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsetSize(NonZeroUsize);

impl SubsetSize {
    pub fn new(size: usize) -> Option<Self> {
        NonZeroUsize::new(size).map(SubsetSize)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<i64> for SubsetSize {
    type Error = SitemapError;

    fn try_from(value: i64) -> Result<Self> {
        usize::try_from(value)
            .ok()
            .and_then(SubsetSize::new)
            .ok_or_else(|| SitemapError::UnsupportedSubsetSize(value.to_string()))
    }
}

impl FromStr for SubsetSize {
    type Err = SitemapError;

    fn from_str(input: &str) -> Result<Self> {
        let value: i64 = input
            .trim()
            .parse()
            .map_err(|_| SitemapError::UnsupportedSubsetSize(input.to_string()))?;
        SubsetSize::try_from(value)
    }
}

/// Result of subsetting: the kept URLs plus the size of the original list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset {
    pub total_urls: usize,
    pub urls: Vec<SitemapEntry>,
}

impl Subset {
    pub fn subset_size(&self) -> usize {
        self.urls.len()
    }
}

/// Partitions `urls` into groups ordered by first appearance of their key.
pub fn group_urls(urls: &[SitemapEntry], policy: GroupingPolicy) -> Result<Vec<UrlGroup>> {
    let mut groups: Vec<UrlGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for url in urls {
        let key = policy.key_for(url)?;
        match positions.get(&key) {
            Some(&idx) => groups[idx].urls.push(url.clone()),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(UrlGroup {
                    key,
                    urls: vec![url.clone()],
                });
            }
        }
    }

    Ok(groups)
}

/// Keeps the first `size` URLs of every group, groups in discovery order.
pub fn subset_urls(
    urls: &[SitemapEntry],
    size: SubsetSize,
    policy: GroupingPolicy,
) -> Result<Subset> {
    let limit = size.get();
    let kept = group_urls(urls, policy)?
        .into_iter()
        .flat_map(|group| group.urls.into_iter().take(limit))
        .collect();

    Ok(Subset {
        total_urls: urls.len(),
        urls: kept,
    })
}
