//! Crawler module for wiki page discovery and extraction
//!
//! This module contains the core crawling logic, including:
//! - Link discovery on navigation index pages
//! - Visit planning with ignore lists and de-duplication
//! - Image downloads into the image cache
//! - Overall crawl coordination

mod coordinator;
mod discover;
mod fetcher;
mod frontier;

pub use coordinator::{Coordinator, CrawlOptions, CrawlOutcome};
pub use discover::{extract_hrefs, LinkDiscoverer, SelectorDiscoverer};
pub use fetcher::{FetchOutcome, ImageFetcher, ImageRequest};
pub use frontier::Frontier;

use crate::browser::{self, Browser, LaunchOptions};
use crate::config::Config;
use crate::extract::{parse_selector, EntityKind, WikiExtractor};
use crate::storage::open_image_store;
use crate::url::{normalize_url, resolve_href, same_site, IgnoreList};
use crate::{ScrapeError, UrlError};
use std::sync::Arc;

/// What to crawl
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub kind: EntityKind,

    /// Seed URL override; the kind's configured seed when `None`
    pub seed: Option<String>,

    /// Extract only the seed page
    pub single: bool,
}

impl CrawlRequest {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            seed: None,
            single: false,
        }
    }
}

/// Runs a complete crawl with the configured browser engine
///
/// This is the main entry point for a crawl. It will:
/// 1. Launch the browser
/// 2. Open the image cache and the page handle
/// 3. Discover and visit pages, downloading their images
/// 4. Close the page and the browser, whatever the outcome
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `request` - The kind, seed and mode to crawl
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The dataset and the crawl report
/// * `Err(ScrapeError)` - Crawl aborted; no records are returned
pub async fn run_crawl(config: &Config, request: &CrawlRequest) -> Result<CrawlOutcome, ScrapeError> {
    let browser = browser::launch(&LaunchOptions::from_config(config)).await?;

    let result = run_with_browser(config, request, browser.clone()).await;

    if let Err(e) = browser.close().await {
        tracing::warn!("Failed to close browser: {}", e);
    }
    result
}

/// Runs a crawl on an already-running browser
///
/// The crawl's page handle is closed before returning; the browser is left
/// to the caller.
pub async fn run_with_browser(
    config: &Config,
    request: &CrawlRequest,
    browser: Arc<dyn Browser>,
) -> Result<CrawlOutcome, ScrapeError> {
    let kind = request.kind;
    let kind_config = config.kinds.get(kind);
    let root = config.site_root()?;

    let seed_text = request.seed.as_deref().unwrap_or(&kind_config.seed);
    let seed = normalize_url(&resolve_href(&root, seed_text)?);
    if !same_site(&root, &seed) {
        return Err(UrlError::OffSite {
            url: seed.to_string(),
            root: root.to_string(),
        }
        .into());
    }

    let profile = config.profile()?;
    let compiled = Arc::new(profile.compile(&config.site.profile)?);

    let store = open_image_store(&config.output.image_dir)?;
    let images = Arc::new(ImageFetcher::new(browser.clone(), store));
    let extractor = Arc::new(WikiExtractor::new(
        kind,
        compiled,
        root.clone(),
        config.challenges.categories.clone(),
        images,
    ));

    let single = request.single || kind_config.single_page;
    let discoverer: Option<Box<dyn LinkDiscoverer>> = match profile.navigation_for(kind) {
        Some(selector) if !single => Some(Box::new(SelectorDiscoverer::new(parse_selector(selector)?))),
        _ => None,
    };

    let options = CrawlOptions {
        single,
        skip_seed: kind_config.skip_seed,
        navigation_retries: config.site.navigation_retries,
    };
    let ignore = IgnoreList::from_entries(&root, &kind_config.ignore)?;
    tracing::debug!("{} crawl from {} ({} ignore entries)", kind, seed, ignore.len());

    let coordinator = Coordinator::new(root, extractor, discoverer, ignore, options);

    let page = browser.new_page().await?;
    let result = coordinator.run(page.as_ref(), &seed).await;
    if let Err(e) = page.close().await {
        tracing::warn!("Failed to close page: {}", e);
    }
    result
}
