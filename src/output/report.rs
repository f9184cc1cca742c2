//! Crawl report
//!
//! Collects the data-quality observations made during one crawl so they can
//! be reviewed after the run instead of being lost in the progress log.

use crate::crawler::FetchOutcome;
use crate::extract::{EntityKind, Finding};
use std::fmt;

/// Summary of one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub kind: EntityKind,

    /// The seed URL the crawl started from
    pub seed: String,

    /// Pages extracted
    pub visited: usize,

    /// Records in the final dataset
    pub records: usize,

    /// Discovered links that matched the ignore list
    pub ignored: usize,

    /// Discovered links that were already queued
    pub duplicates: usize,

    /// Discovered links that left the site
    pub off_site: usize,

    /// Discovery ran and produced no usable links
    pub empty_discovery: bool,

    /// Navigation timeouts that were retried
    pub retries: usize,

    /// Names produced by more than one record; the last one was kept
    pub collisions: Vec<String>,

    /// Pages whose infobox was chosen without a confident title match
    pub low_confidence: Vec<String>,

    /// Pages or rows dropped for lack of a name
    pub nameless: usize,

    /// Challenge tables past the end of the category list
    pub unmapped_tables: usize,

    pub images_downloaded: usize,
    pub images_cached: usize,

    /// Filenames of images that could not be downloaded
    pub images_failed: Vec<String>,
}

impl CrawlReport {
    pub fn new(kind: EntityKind, seed: &str) -> Self {
        Self {
            kind,
            seed: seed.to_string(),
            visited: 0,
            records: 0,
            ignored: 0,
            duplicates: 0,
            off_site: 0,
            empty_discovery: false,
            retries: 0,
            collisions: Vec::new(),
            low_confidence: Vec::new(),
            nameless: 0,
            unmapped_tables: 0,
            images_downloaded: 0,
            images_cached: 0,
            images_failed: Vec::new(),
        }
    }

    /// Tallies the findings of one page
    ///
    /// Extractors log each finding as it happens; this only counts them.
    pub fn record_findings(&mut self, findings: &[Finding]) {
        for finding in findings {
            match finding {
                Finding::LowConfidence { url, .. } => self.low_confidence.push(url.clone()),
                Finding::Nameless { .. } => self.nameless += 1,
                Finding::ImageFailed { file_name, .. } => self.images_failed.push(file_name.clone()),
                Finding::UnmappedTable { .. } => self.unmapped_tables += 1,
            }
        }
    }

    /// Tallies successful image outcomes; failures arrive as findings
    pub fn record_images(&mut self, outcomes: &[FetchOutcome]) {
        for outcome in outcomes {
            match outcome {
                FetchOutcome::Downloaded { .. } => self.images_downloaded += 1,
                FetchOutcome::Cached { .. } => self.images_cached += 1,
                FetchOutcome::Failed { .. } => {}
            }
        }
    }

    /// Returns true when anything in the run needs a human to look at it
    pub fn has_warnings(&self) -> bool {
        self.empty_discovery
            || !self.collisions.is_empty()
            || !self.low_confidence.is_empty()
            || self.nameless > 0
            || self.unmapped_tables > 0
            || !self.images_failed.is_empty()
    }
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} crawl ===", self.kind)?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f, "  Pages visited: {}", self.visited)?;
        writeln!(f, "  Records: {}", self.records)?;
        writeln!(
            f,
            "  Links skipped: {} ignored, {} duplicate, {} off-site",
            self.ignored, self.duplicates, self.off_site
        )?;
        if self.retries > 0 {
            writeln!(f, "  Navigation retries: {}", self.retries)?;
        }
        writeln!(
            f,
            "  Images: {} downloaded, {} cached, {} failed",
            self.images_downloaded,
            self.images_cached,
            self.images_failed.len()
        )?;

        if self.empty_discovery {
            writeln!(f, "  WARNING: discovery found no usable links")?;
        }
        if !self.collisions.is_empty() {
            writeln!(f, "  Name collisions ({}):", self.collisions.len())?;
            for name in &self.collisions {
                writeln!(f, "    - {}", name)?;
            }
        }
        if !self.low_confidence.is_empty() {
            writeln!(f, "  Low-confidence infobox matches ({}):", self.low_confidence.len())?;
            for url in &self.low_confidence {
                writeln!(f, "    - {}", url)?;
            }
        }
        if self.nameless > 0 {
            writeln!(f, "  Nameless records dropped: {}", self.nameless)?;
        }
        if self.unmapped_tables > 0 {
            writeln!(f, "  Unmapped challenge tables: {}", self.unmapped_tables)?;
        }
        if !self.images_failed.is_empty() {
            writeln!(f, "  Failed images:")?;
            for name in &self.images_failed {
                writeln!(f, "    - {}", name)?;
            }
        }
        Ok(())
    }
}

/// Emits the report through the log
pub fn log_report(report: &CrawlReport) {
    for line in report.to_string().lines() {
        if report.has_warnings() {
            tracing::warn!("{}", line);
        } else {
            tracing::info!("{}", line);
        }
    }
}
