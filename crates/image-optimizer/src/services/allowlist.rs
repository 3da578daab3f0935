//! Source host allow-list

use crate::utils::url::UrlUtils;

/// Host suffixes that may be fetched
#[derive(Debug, Clone)]
pub enum DomainAllowList {
    /// `*`: every URL is permitted, even ones that will fail to fetch
    Any,
    Suffixes(Vec<String>),
}

impl DomainAllowList {
    /// Parse the comma-separated config value
    ///
    /// Suffixes are trimmed and lower-cased; empty items are dropped. A list
    /// that ends up empty permits nothing.
    pub fn parse(allowed_domains: &str) -> Self {
        if allowed_domains.trim() == "*" {
            return Self::Any;
        }

        Self::Suffixes(
            allowed_domains
                .split(',')
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn is_permitted(&self, url: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Suffixes(suffixes) => UrlUtils::extract_host(url)
                .is_some_and(|host| suffixes.iter().any(|suffix| host.ends_with(suffix.as_str()))),
        }
    }

    pub fn allows_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl std::fmt::Display for DomainAllowList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Suffixes(suffixes) => f.write_str(&suffixes.join(",")),
        }
    }
}
