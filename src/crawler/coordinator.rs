//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop for one entity kind:
//! - Loading the seed and discovering entity links (batch mode)
//! - Planning the de-duplicated visit list
//! - Visiting each page in sequence on a single page handle
//! - Accumulating records keyed by entity name
//! - Retrying navigation timeouts and aborting on anything else

use crate::browser::Page;
use crate::crawler::discover::LinkDiscoverer;
use crate::crawler::frontier::Frontier;
use crate::extract::{EntityExtractor, Extracted};
use crate::output::{CrawlReport, Dataset};
use crate::url::IgnoreList;
use crate::ScrapeError;
use std::future::Future;
use std::sync::Arc;
use url::Url;

/// Options for one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Skip discovery and extract only the seed page
    pub single: bool,

    /// Leave the seed out of the visited set in batch mode
    pub skip_seed: bool,

    /// Retries after a navigation timeout before the crawl aborts
    pub navigation_retries: u32,
}

/// The aggregate records of a crawl and what happened along the way
#[derive(Debug)]
pub struct CrawlOutcome {
    pub dataset: Dataset,
    pub report: CrawlReport,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    root: Url,
    extractor: Arc<dyn EntityExtractor>,
    discoverer: Option<Box<dyn LinkDiscoverer>>,
    ignore: IgnoreList,
    options: CrawlOptions,
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `root` - Site root that discovered links resolve against
    /// * `extractor` - Extractor for the crawled entity kind
    /// * `discoverer` - Link discovery for batch mode; `None` forces single mode
    /// * `ignore` - URLs that never reach the extractor
    /// * `options` - Crawl mode and retry settings
    pub fn new(
        root: Url,
        extractor: Arc<dyn EntityExtractor>,
        discoverer: Option<Box<dyn LinkDiscoverer>>,
        ignore: IgnoreList,
        options: CrawlOptions,
    ) -> Self {
        Self {
            root,
            extractor,
            discoverer,
            ignore,
            options,
        }
    }

    /// Runs the crawl on `page`, starting from `seed`
    ///
    /// Pages are visited strictly in sequence and each visit, including its
    /// image downloads, settles before the next one starts. Any error other
    /// than a retried timeout aborts the crawl and discards the records
    /// gathered so far.
    pub async fn run(&self, page: &dyn Page, seed: &Url) -> Result<CrawlOutcome, ScrapeError> {
        let kind = self.extractor.kind();
        let mut report = CrawlReport::new(kind, seed.as_str());

        let urls = match &self.discoverer {
            Some(discoverer) if !self.options.single => {
                self.plan(page, discoverer.as_ref(), seed, &mut report).await?
            }
            _ => vec![seed.clone()],
        };

        let mut dataset = Dataset::new();
        let total = urls.len();

        for (i, url) in urls.iter().enumerate() {
            tracing::info!("[{}/{}] {}", i + 1, total, url);

            let extracted = self.extract(page, url, &mut report).await?;
            report.visited += 1;
            report.record_findings(&extracted.findings);
            report.record_images(&extracted.images);

            for record in extracted.records {
                let name = record.name().as_str().to_string();
                if dataset.insert(name.clone(), record).is_some() {
                    tracing::warn!("{}: name {:?} already recorded; replacing the earlier record", url, name);
                    report.collisions.push(name);
                }
            }
        }

        report.records = dataset.len();
        tracing::info!("Crawl of {} complete: {} record(s) from {} page(s)", kind, dataset.len(), total);

        Ok(CrawlOutcome { dataset, report })
    }

    /// Loads the seed, discovers links, and builds the visit list
    async fn plan(
        &self,
        page: &dyn Page,
        discoverer: &dyn LinkDiscoverer,
        seed: &Url,
        report: &mut CrawlReport,
    ) -> Result<Vec<Url>, ScrapeError> {
        tracing::info!("Discovering links on {}", seed);
        retry(self.options.navigation_retries, seed, report, move || async move {
            page.goto(seed).await.map_err(ScrapeError::from)
        })
        .await?;

        let hrefs = discoverer.discover(page, seed).await?;
        let frontier = Frontier::plan(&self.root, seed, &hrefs, &self.ignore, self.options.skip_seed);
        report.ignored = frontier.ignored;
        report.duplicates = frontier.duplicates;
        report.off_site = frontier.off_site;

        if hrefs.is_empty() {
            tracing::warn!("Discovery on {} found no links; the navigation selector may be stale", seed);
            report.empty_discovery = true;
        } else if frontier.accepted == 0 {
            tracing::warn!(
                "Discovery on {} found {} link(s) but none are usable ({} ignored, {} duplicate, {} off-site)",
                seed,
                hrefs.len(),
                frontier.ignored,
                frontier.duplicates,
                frontier.off_site
            );
            report.empty_discovery = true;
        }

        tracing::info!(
            "{} link(s) discovered, {} page(s) to visit ({} ignored, {} duplicate)",
            hrefs.len(),
            frontier.len(),
            frontier.ignored,
            frontier.duplicates
        );
        Ok(frontier.into_urls())
    }

    async fn extract(&self, page: &dyn Page, url: &Url, report: &mut CrawlReport) -> Result<Extracted, ScrapeError> {
        let extractor = self.extractor.as_ref();
        retry(self.options.navigation_retries, url, report, move || extractor.extract(page, url)).await
    }
}

/// Runs `op`, retrying it after navigation timeouts
async fn retry<T, F, Fut>(retries: u32, url: &Url, report: &mut CrawlReport, mut op: F) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScrapeError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(e) if e.is_timeout() && attempt < retries => {
                attempt += 1;
                report.retries += 1;
                tracing::warn!("{}; retrying {} ({}/{})", e, url, attempt, retries);
            }
            result => return result,
        }
    }
}
