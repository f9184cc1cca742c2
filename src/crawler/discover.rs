//! Link discovery on navigation index pages

use crate::browser::Page;
use crate::url::{is_non_navigational, same_document};
use crate::ScrapeError;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Finds the entity links on an already-loaded index page
#[async_trait]
pub trait LinkDiscoverer: Send + Sync {
    /// Returns the raw hrefs of the navigation region, in document order
    ///
    /// A region that matches nothing yields an empty list, not an error.
    async fn discover(&self, page: &dyn Page, page_url: &Url) -> Result<Vec<String>, ScrapeError>;
}

/// Discovers links under a CSS selector
pub struct SelectorDiscoverer {
    selector: Selector,
}

impl SelectorDiscoverer {
    pub fn new(selector: Selector) -> Self {
        Self { selector }
    }
}

#[async_trait]
impl LinkDiscoverer for SelectorDiscoverer {
    async fn discover(&self, page: &dyn Page, page_url: &Url) -> Result<Vec<String>, ScrapeError> {
        let html = page.content().await?;
        Ok(extract_hrefs(&html, &self.selector, page_url))
    }
}

/// Collects hrefs from the elements matching `selector`
///
/// A matched `<a>` contributes its own href; any other matched element
/// contributes the hrefs of the anchors inside it. Fragment-only and
/// non-HTTP links are skipped, as are links back to the page itself.
pub fn extract_hrefs(html: &str, selector: &Selector, page_url: &Url) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut hrefs = Vec::new();

    for region in doc.select(selector) {
        if region.value().name() == "a" {
            push_href(region, page_url, &mut hrefs);
            continue;
        }
        for anchor in region.descendants().filter_map(ElementRef::wrap) {
            if anchor.value().name() == "a" {
                push_href(anchor, page_url, &mut hrefs);
            }
        }
    }

    hrefs
}

fn push_href(anchor: ElementRef<'_>, page_url: &Url, hrefs: &mut Vec<String>) {
    let Some(href) = anchor.value().attr("href") else {
        return;
    };
    if is_non_navigational(href) {
        return;
    }
    if let Ok(target) = page_url.join(href.trim()) {
        if same_document(&target, page_url) {
            return;
        }
    }
    hrefs.push(href.trim().to_string());
}
