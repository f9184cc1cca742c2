//! URL handling module for the scraper
//!
//! This module provides href resolution against the site root, same-site
//! checks, de-duplication keys, ignore-list matching, and the derivation of
//! local image filenames from image URLs.

mod domain;
mod filename;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::same_site;
pub use filename::{image_file_name, image_stem, is_image_file, IMAGE_EXTENSIONS};
pub use matcher::{matches_pattern, IgnoreList};
pub use normalize::normalize_url;

use crate::UrlError;
use url::Url;

/// Resolves an href found on the wiki to an absolute URL
///
/// Root-relative (`/wiki/Crowbar`), protocol-relative (`//host/path`) and
/// absolute hrefs are all accepted. Only HTTP(S) results are returned.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use handbook_scraper::url::resolve_href;
///
/// let root = Url::parse("https://riskofrain2.fandom.com").unwrap();
/// let url = resolve_href(&root, "/wiki/Crowbar").unwrap();
/// assert_eq!(url.as_str(), "https://riskofrain2.fandom.com/wiki/Crowbar");
/// ```
pub fn resolve_href(root: &Url, href: &str) -> Result<Url, UrlError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(UrlError::Parse("empty href".to_string()));
    }

    let url = root
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Resolves an image `src` to an absolute URL
///
/// Inline `data:` URIs (lazy-loading placeholders) are not downloadable and
/// yield `None`, as does anything that does not resolve to HTTP(S).
pub fn resolve_image(root: &Url, src: &str) -> Option<Url> {
    let src = src.trim();
    if src.is_empty() || src.starts_with("data:") {
        return None;
    }
    resolve_href(root, src).ok()
}

/// Returns true for hrefs that never lead to another page
pub fn is_non_navigational(href: &str) -> bool {
    let href = href.trim();
    href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
}

/// Compares two URLs ignoring their fragments
pub fn same_document(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}
