use url::Url;

/// Checks whether a URL belongs to the same site as the root
///
/// Hosts are compared case-insensitively along with the effective port. The
/// scheme is ignored so `http` links on an `https` wiki still count as on-site.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use handbook_scraper::url::same_site;
///
/// let root = Url::parse("https://riskofrain2.fandom.com").unwrap();
/// let page = Url::parse("https://riskofrain2.fandom.com/wiki/Crowbar").unwrap();
/// let other = Url::parse("https://community.fandom.com/wiki/Help").unwrap();
/// assert!(same_site(&root, &page));
/// assert!(!same_site(&root, &other));
/// ```
pub fn same_site(root: &Url, candidate: &Url) -> bool {
    let host = |url: &Url| url.host_str().map(|h| h.to_lowercase());
    match (host(root), host(candidate)) {
        (Some(a), Some(b)) => a == b && root.port() == candidate.port(),
        _ => false,
    }
}
