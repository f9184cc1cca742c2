use crate::url::{normalize_url, resolve_href};
use crate::UrlError;
use url::Url;

/// Checks if a normalized URL matches an ignore pattern
///
/// This function supports two types of patterns:
/// 1. Exact match: `https://w.com/wiki/Items` matches only that URL
/// 2. Prefix match: `https://w.com/wiki/Items*` matches:
///    - `https://w.com/wiki/Items` (the page itself)
///    - `https://w.com/wiki/Items#Boss` (its section anchors)
///    - `https://w.com/wiki/Items/Legacy` (anything below it)
///
/// # Examples
///
/// ```
/// use handbook_scraper::url::matches_pattern;
///
/// assert!(matches_pattern("https://w.com/wiki/Items", "https://w.com/wiki/Items"));
/// assert!(!matches_pattern("https://w.com/wiki/Items", "https://w.com/wiki/Items#Boss"));
/// assert!(matches_pattern("https://w.com/wiki/Items*", "https://w.com/wiki/Items#Boss"));
/// ```
pub fn matches_pattern(pattern: &str, candidate: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix('*') {
        candidate.starts_with(prefix)
    } else {
        candidate == pattern
    }
}

/// Set of URLs that must never reach an extractor
///
/// Entries are resolved against the site root and normalized once, so an
/// ignore entry written as a relative href still matches the absolute URL
/// produced by discovery.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<String>,
}

impl IgnoreList {
    /// Builds the ignore list from configured entries
    pub fn from_entries(root: &Url, entries: &[String]) -> Result<Self, UrlError> {
        let mut patterns = Vec::with_capacity(entries.len());

        for entry in entries {
            let entry = entry.trim();
            let (href, wildcard) = match entry.strip_suffix('*') {
                Some(href) => (href, true),
                None => (entry, false),
            };

            let url = normalize_url(&resolve_href(root, href)?);
            let mut pattern = url.to_string();
            if wildcard {
                pattern.push('*');
            }
            patterns.push(pattern);
        }

        Ok(Self { patterns })
    }

    /// Returns true if the URL is covered by any entry
    pub fn contains(&self, url: &Url) -> bool {
        let candidate = normalize_url(url).to_string();
        self.patterns
            .iter()
            .any(|pattern| matches_pattern(pattern, &candidate))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
