use url::Url;

/// Query parameters that never change which wiki page is served
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "so",
    "file",
];

/// Normalizes an absolute URL into the key used for de-duplication
///
/// # Normalization Steps
///
/// 1. Collapse empty path segments (`//`)
/// 2. Remove a trailing slash (except for root `/`)
/// 3. Remove tracking query parameters and sort the remaining ones
/// 4. Remove an empty query string and an empty fragment
///
/// Non-empty fragments are kept: ignore lists name section anchors such as
/// `/wiki/Items#Common` explicitly. Host lowercasing, default ports, and dot
/// segments are already handled by the `url` parser.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use handbook_scraper::url::normalize_url;
///
/// let url = Url::parse("https://Wiki.example.com//wiki/Crowbar/?so=search").unwrap();
/// assert_eq!(normalize_url(&url).as_str(), "https://wiki.example.com/wiki/Crowbar");
/// ```
pub fn normalize_url(url: &Url) -> Url {
    let mut url = url.clone();

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);
        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    if url.fragment() == Some("") {
        url.set_fragment(None);
    }

    url
}

/// Collapses empty segments and removes a trailing slash
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort();
    params
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(s: &str) -> String {
        normalize_url(&Url::parse(s).unwrap()).to_string()
    }

    #[test]
    fn test_remove_trailing_slash() {
        assert_eq!(
            normalize("https://example.com/wiki/Crowbar/"),
            "https://example.com/wiki/Crowbar"
        );
    }

    #[test]
    fn test_keep_root_slash() {
        assert_eq!(normalize("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn test_keep_section_fragment() {
        assert_eq!(
            normalize("https://example.com/wiki/Items#Common"),
            "https://example.com/wiki/Items#Common"
        );
    }

    #[test]
    fn test_drop_empty_fragment() {
        assert_eq!(
            normalize("https://example.com/wiki/Items#"),
            "https://example.com/wiki/Items"
        );
    }

    #[test]
    fn test_remove_tracking_params() {
        assert_eq!(
            normalize("https://example.com/wiki/Crowbar?so=search&utm_source=x"),
            "https://example.com/wiki/Crowbar"
        );
    }

    #[test]
    fn test_sort_query_params() {
        assert_eq!(
            normalize("https://example.com/index.php?title=Crowbar&action=view"),
            "https://example.com/index.php?action=view&title=Crowbar"
        );
    }

    #[test]
    fn test_multiple_slashes() {
        assert_eq!(
            normalize("https://example.com///wiki//Crowbar"),
            "https://example.com/wiki/Crowbar"
        );
    }

    #[test]
    fn test_scheme_and_port_preserved() {
        assert_eq!(
            normalize("http://127.0.0.1:8080/wiki/Crowbar"),
            "http://127.0.0.1:8080/wiki/Crowbar"
        );
    }

    #[test]
    fn test_lowercase_host() {
        assert_eq!(
            normalize("https://EXAMPLE.COM/wiki/Crowbar"),
            "https://example.com/wiki/Crowbar"
        );
    }
}
