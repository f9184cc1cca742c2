//! Entity extraction module
//!
//! This module turns a loaded wiki page into dataset records:
//! - Infobox selection (including pages documenting several entities)
//! - Labelled field reads, tolerant of absent fields
//! - Variable-width stat tables keyed by camelCase headers
//! - Survivor skill tables with unlock notes
//! - Challenge and artifact tables
//!
//! All DOM access goes through a compiled [`SelectorProfile`], so the
//! extractors are independent of any one markup generation.

mod artifact;
mod challenge;
mod dom;
mod infobox;
mod item;
mod media;
mod normalize;
mod profile;
mod record;
mod stats;
mod survivor;
mod unlock;

pub use dom::parse_selector;
pub use infobox::{title_from_url, title_similarity, MATCH_THRESHOLD};
pub use normalize::camel_case_key;
pub use profile::{
    ArtifactLayout, ChallengeLayout, CompiledProfile, FieldKeys, FieldLayout, NavigationSelectors,
    SelectorProfile, SkillLayout,
};
pub use record::{
    ArtifactRecord, ChallengeRecord, EntityName, Fields, ImageRef, ItemRecord, Record,
    SkillRecord, SurvivorRecord,
};
pub use stats::zip_row;
pub use unlock::parse_unlock;

use crate::browser::Page;
use crate::crawler::{FetchOutcome, ImageFetcher, ImageRequest};
use crate::ScrapeError;
use async_trait::async_trait;
use scraper::Html;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// The kinds of entity the wiki documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Item,
    Equipment,
    Survivor,
    Challenge,
    Artifact,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Item,
        EntityKind::Equipment,
        EntityKind::Survivor,
        EntityKind::Challenge,
        EntityKind::Artifact,
    ];

    /// Plural name, as used for CLI actions and config tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Item => "items",
            Self::Equipment => "equipment",
            Self::Survivor => "survivors",
            Self::Challenge => "challenges",
            Self::Artifact => "artifacts",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "items" | "item" => Ok(Self::Item),
            "equipment" => Ok(Self::Equipment),
            "survivors" | "survivor" => Ok(Self::Survivor),
            "challenges" | "challenge" => Ok(Self::Challenge),
            "artifacts" | "artifact" => Ok(Self::Artifact),
            other => Err(format!("unknown entity kind '{}'", other)),
        }
    }
}

/// Unexpected extraction failures
///
/// An absent element is never one of these.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Malformed page {url}: {message}")]
    Malformed { url: String, message: String },
}

/// Data-quality observations made while extracting a page
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// Several infoboxes, none matching the page title; the first was used
    LowConfidence {
        url: String,
        chosen: String,
        candidates: usize,
    },

    /// A page or row that produced no entity name; nothing was recorded
    Nameless { url: String },

    /// An image could not be downloaded; the record was kept
    ImageFailed {
        url: String,
        file_name: String,
        reason: String,
    },

    /// A challenge table past the end of the category list
    UnmappedTable { url: String, index: usize },
}

/// Result of extracting one page
#[derive(Debug, Default)]
pub struct Extracted {
    pub records: Vec<Record>,
    pub findings: Vec<Finding>,
    pub images: Vec<FetchOutcome>,
}

/// Extracts records of one kind from a page
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    fn kind(&self) -> EntityKind;

    /// Navigates `page` to `url` and extracts every record it documents
    async fn extract(&self, page: &dyn Page, url: &Url) -> Result<Extracted, ScrapeError>;
}

/// Inputs shared by the per-kind scanners
pub(crate) struct PageContext<'a> {
    pub profile: &'a CompiledProfile,
    pub root: &'a Url,
    pub url: &'a Url,
    pub categories: &'a [String],
}

/// Output of a synchronous pass over one DOM snapshot
#[derive(Debug, Default)]
pub(crate) struct Scan {
    pub records: Vec<Record>,
    pub findings: Vec<Finding>,
    pub images: Vec<ImageRequest>,
}

/// Profile-driven extractor for every entity kind
pub struct WikiExtractor {
    kind: EntityKind,
    profile: Arc<CompiledProfile>,
    root: Url,
    categories: Vec<String>,
    images: Arc<ImageFetcher>,
}

impl WikiExtractor {
    pub fn new(
        kind: EntityKind,
        profile: Arc<CompiledProfile>,
        root: Url,
        categories: Vec<String>,
        images: Arc<ImageFetcher>,
    ) -> Self {
        Self {
            kind,
            profile,
            root,
            categories,
            images,
        }
    }

    /// Reads every record from an HTML snapshot without touching the network
    pub(crate) fn scan(&self, html: &str, url: &Url) -> Result<Scan, ExtractError> {
        if html.trim().is_empty() {
            return Err(ExtractError::Malformed {
                url: url.to_string(),
                message: "empty document".to_string(),
            });
        }

        let doc = Html::parse_document(html);
        let ctx = PageContext {
            profile: &self.profile,
            root: &self.root,
            url,
            categories: &self.categories,
        };

        Ok(scan_document(self.kind, &doc, &ctx))
    }
}

fn scan_document(kind: EntityKind, doc: &Html, ctx: &PageContext<'_>) -> Scan {
    let mut scan = Scan::default();
    match kind {
        EntityKind::Item => item::scan_item(doc, ctx, false, &mut scan),
        EntityKind::Equipment => item::scan_item(doc, ctx, true, &mut scan),
        EntityKind::Survivor => survivor::scan_survivor(doc, ctx, &mut scan),
        EntityKind::Challenge => challenge::scan_challenges(doc, ctx, &mut scan),
        EntityKind::Artifact => artifact::scan_artifacts(doc, ctx, &mut scan),
    }
    scan
}

#[async_trait]
impl EntityExtractor for WikiExtractor {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    async fn extract(&self, page: &dyn Page, url: &Url) -> Result<Extracted, ScrapeError> {
        page.goto(url).await?;
        let html = page.content().await?;
        let scan = self.scan(&html, url)?;

        tracing::debug!(
            "{}: {} record(s), {} image(s)",
            url,
            scan.records.len(),
            scan.images.len()
        );

        let images = self.images.fetch_all(&scan.images).await;
        let mut findings = scan.findings;
        for outcome in &images {
            if let FetchOutcome::Failed {
                file_name, reason, ..
            } = outcome
            {
                findings.push(Finding::ImageFailed {
                    url: url.to_string(),
                    file_name: file_name.clone(),
                    reason: reason.clone(),
                });
            }
        }

        Ok(Extracted {
            records: scan.records,
            findings,
            images,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::CHALLENGE_CATEGORIES;

    /// Scans an HTML snapshot with the built-in fandom profile
    pub(crate) fn scan_html(kind: EntityKind, html: &str, url: &str) -> Scan {
        let profile = SelectorProfile::fandom().compile("fandom").unwrap();
        let root = Url::parse("https://riskofrain2.fandom.com").unwrap();
        let url = Url::parse(url).unwrap();
        let categories: Vec<String> = CHALLENGE_CATEGORIES.iter().map(|c| c.to_string()).collect();

        let doc = Html::parse_document(html);
        let ctx = PageContext {
            profile: &profile,
            root: &root,
            url: &url,
            categories: &categories,
        };
        scan_document(kind, &doc, &ctx)
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("items".parse::<EntityKind>(), Ok(EntityKind::Item));
        assert_eq!("Survivor".parse::<EntityKind>(), Ok(EntityKind::Survivor));
        assert!("gencode".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_kind_display_roundtrips() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.to_string().parse::<EntityKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_page_scan_is_tolerant_of_foreign_markup() {
        let scan = scan_html(
            EntityKind::Artifact,
            "<div><p>Nothing tabular here</p></div>",
            "https://riskofrain2.fandom.com/wiki/Artifacts",
        );
        assert!(scan.records.is_empty());
        assert!(scan.findings.is_empty());
    }
}
