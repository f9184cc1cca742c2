//! Browser abstraction for the scraper
//!
//! The crawl drives a single page handle serially and opens short-lived
//! extra pages for image downloads. Two engines implement the traits here:
//!
//! - `chromium`: a real headless Chromium over CDP, for hosts with bot mitigation
//! - `http`: a plain HTTP client with browser-like headers

mod chromium;
mod http;

pub use chromium::ChromiumBrowser;
pub use http::{build_http_client, HttpBrowser, HttpPage};

use crate::config::Config;
use async_trait::async_trait;
use serde::Deserialize;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Browser and navigation errors
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("No page has been loaded yet")]
    NoPage,
}

impl BrowserError {
    /// Returns true for navigation timeouts, which the crawler may retry
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Which engine drives page navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Chromium,
    Http,
}

/// A single browser tab
///
/// Navigation is sequential: callers must await `goto` before reading the
/// DOM snapshot with `content`.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigates to `url` and waits for the load to settle
    async fn goto(&self, url: &Url) -> Result<(), BrowserError>;

    /// HTML snapshot of the current document
    async fn content(&self) -> Result<String, BrowserError>;

    /// Navigates to a binary resource and returns its body
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, BrowserError>;

    /// Releases the tab
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// A browser instance owning any number of pages
#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn Page>, BrowserError>;

    /// Shuts the browser down; pages must not be used afterwards
    async fn close(&self) -> Result<(), BrowserError>;
}

/// Settings needed to start either engine
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub engine: Engine,
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl LaunchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            engine: config.browser.engine,
            headless: config.browser.headless,
            executable: config.browser.executable.clone(),
            user_agent: config.site.user_agent.clone(),
            timeout: config.navigation_timeout(),
        }
    }
}

/// Starts the configured engine
pub async fn launch(options: &LaunchOptions) -> Result<Arc<dyn Browser>, BrowserError> {
    tracing::debug!("Launching {:?} browser", options.engine);
    match options.engine {
        Engine::Chromium => Ok(Arc::new(ChromiumBrowser::launch(options).await?)),
        Engine::Http => Ok(Arc::new(HttpBrowser::new(options)?)),
    }
}

/// Runs a navigation future under the optional timeout
pub(crate) async fn with_timeout<T, F>(
    timeout: Option<Duration>,
    url: &Url,
    fut: F,
) -> Result<T, BrowserError>
where
    F: Future<Output = Result<T, BrowserError>>,
{
    match timeout {
        None => fut.await,
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(BrowserError::Timeout {
                url: url.to_string(),
                seconds: limit.as_secs(),
            }),
        },
    }
}
