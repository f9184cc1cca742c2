use crate::browser::Engine;
use crate::extract::{EntityKind, SelectorProfile};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure for the scraper
///
/// Every section has a built-in default, so a config file only needs to name
/// the values it overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub browser: BrowserConfig,
    pub output: OutputConfig,
    pub kinds: KindsConfig,
    pub challenges: ChallengeConfig,

    /// Extra selector profiles, selectable through `site.profile`
    pub profiles: BTreeMap<String, SelectorProfile>,
}

/// Target wiki configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Site root that relative links and images are resolved against
    pub root: String,

    /// User agent presented by both browser engines
    pub user_agent: String,

    /// Navigation timeout in seconds (0 disables the timeout)
    pub navigation_timeout_secs: u64,

    /// How many times a timed-out navigation is retried before the crawl aborts
    pub navigation_retries: u32,

    /// Name of the selector profile matching the wiki's current markup
    pub profile: String,
}

/// Browser engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    pub engine: Engine,

    /// Run Chromium without a window
    pub headless: bool,

    /// Explicit Chromium executable; autodetected when absent
    pub executable: Option<PathBuf>,
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory downloaded images are cached in
    pub image_dir: PathBuf,

    /// Directory the per-kind JSON datasets are written to
    pub data_dir: PathBuf,

    /// Generated image-name to path mapping module
    pub image_map: PathBuf,
}

/// Per-kind crawl settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KindsConfig {
    pub items: KindConfig,
    pub equipment: KindConfig,
    pub survivors: KindConfig,
    pub challenges: KindConfig,
    pub artifacts: KindConfig,
}

impl KindsConfig {
    /// Returns the settings for one entity kind
    pub fn get(&self, kind: EntityKind) -> &KindConfig {
        match kind {
            EntityKind::Item => &self.items,
            EntityKind::Equipment => &self.equipment,
            EntityKind::Survivor => &self.survivors,
            EntityKind::Challenge => &self.challenges,
            EntityKind::Artifact => &self.artifacts,
        }
    }
}

/// Crawl settings for a single entity kind
///
/// A `[kinds.<kind>]` table in a config file replaces the whole built-in entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KindConfig {
    /// Default seed URL (absolute, or relative to the site root)
    pub seed: String,

    /// URLs that match the discovery selector but are not entity pages.
    /// Entries ending in `*` match by prefix.
    pub ignore: Vec<String>,

    /// Dataset filename inside the data directory
    pub output_file: String,

    /// Leave the seed itself out of the visited set
    pub skip_seed: bool,

    /// The whole dataset lives on the seed page; discovery is never run
    pub single_page: bool,
}

/// Challenge page layout settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Category assigned to each challenge table, in page order
    pub categories: Vec<String>,
}
