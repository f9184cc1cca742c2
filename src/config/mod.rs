//! Configuration module for the scraper
//!
//! This module holds the explicit configuration passed into every crawl: the
//! site root, per-kind seeds and ignore lists, output locations, the challenge
//! category order, and the selector profile matching the wiki's markup.
//!
//! # Example
//!
//! ```no_run
//! use handbook_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Images go to: {}", config.output.image_dir.display());
//! ```

mod defaults;
mod parser;
mod types;
mod validation;

// Re-export types
pub use defaults::{CHALLENGE_CATEGORIES, DEFAULT_USER_AGENT, SITE_ROOT};
pub use types::{
    BrowserConfig, ChallengeConfig, Config, KindConfig, KindsConfig, OutputConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};

use crate::extract::{EntityKind, SelectorProfile};
use crate::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

impl Config {
    /// Parses the configured site root
    pub fn site_root(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.site.root)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site root '{}': {}", self.site.root, e)))
    }

    /// Resolves the selected selector profile and checks that every selector parses
    ///
    /// Profiles declared in the config file take precedence over built-in ones
    /// with the same name.
    pub fn profile(&self) -> Result<SelectorProfile, ConfigError> {
        let name = self.site.profile.as_str();
        let profile = match self.profiles.get(name) {
            Some(profile) => profile.clone(),
            None => SelectorProfile::builtin(name)
                .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?,
        };
        profile.validate(name)?;
        Ok(profile)
    }

    /// Navigation timeout, or `None` when disabled
    pub fn navigation_timeout(&self) -> Option<Duration> {
        match self.site.navigation_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Full path of the dataset file for one entity kind
    pub fn dataset_path(&self, kind: EntityKind) -> PathBuf {
        self.output.data_dir.join(&self.kinds.get(kind).output_file)
    }
}
