//! Image fetcher
//!
//! This module downloads the images referenced by extracted records:
//! - Skipping names already present in the image cache
//! - Fetching each image on its own short-lived browser page
//! - Downloading the images of one page concurrently
//! - Reporting per-image failures without aborting the page

use crate::browser::{Browser, BrowserError};
use crate::storage::{ImageStore, StorageError};
use futures::future::join_all;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// An image an extractor wants downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Absolute image URL
    pub url: Url,

    /// Destination filename inside the image directory
    pub file_name: String,
}

/// Result of a single image download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The image was downloaded and stored
    Downloaded { file_name: String, path: PathBuf },

    /// A file with this name was already cached; no navigation happened
    Cached { file_name: String },

    /// The download failed; the record still references the image
    Failed {
        file_name: String,
        url: String,
        reason: String,
    },
}

impl FetchOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Downloaded { file_name, .. }
            | Self::Cached { file_name }
            | Self::Failed { file_name, .. } => file_name,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Error)]
enum FetchError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("empty response body")]
    Empty,
}

/// Downloads images through the browser into the image cache
pub struct ImageFetcher {
    browser: Arc<dyn Browser>,
    store: Arc<dyn ImageStore>,
}

impl ImageFetcher {
    pub fn new(browser: Arc<dyn Browser>, store: Arc<dyn ImageStore>) -> Self {
        Self { browser, store }
    }

    /// Fetches one image, never failing the caller
    ///
    /// An image whose filename is already cached is reported as
    /// [`FetchOutcome::Cached`] without opening a page.
    pub async fn fetch(&self, request: &ImageRequest) -> FetchOutcome {
        match self.try_fetch(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Failed to download {} ({}): {}", request.file_name, request.url, e);
                FetchOutcome::Failed {
                    file_name: request.file_name.clone(),
                    url: request.url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Fetches every image of one page concurrently
    ///
    /// Requests sharing a filename are downloaded once; outcomes follow the
    /// order of first appearance.
    pub async fn fetch_all(&self, requests: &[ImageRequest]) -> Vec<FetchOutcome> {
        let mut seen = HashSet::new();
        let unique: Vec<&ImageRequest> = requests
            .iter()
            .filter(|r| seen.insert(r.file_name.as_str()))
            .collect();

        join_all(unique.into_iter().map(|r| self.fetch(r))).await
    }

    async fn try_fetch(&self, request: &ImageRequest) -> Result<FetchOutcome, FetchError> {
        if self.store.contains(&request.file_name).await? {
            tracing::debug!("{} already cached", request.file_name);
            return Ok(FetchOutcome::Cached {
                file_name: request.file_name.clone(),
            });
        }

        let page = self.browser.new_page().await?;
        let body = page.fetch_bytes(&request.url).await;
        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close image page: {}", e);
        }

        let bytes = body?;
        if bytes.is_empty() {
            return Err(FetchError::Empty);
        }

        let path = self.store.put(&request.file_name, &bytes).await?;
        tracing::debug!("Downloaded {} -> {}", request.url, path.display());
        Ok(FetchOutcome::Downloaded {
            file_name: request.file_name.clone(),
            path,
        })
    }
}
