//! Output module for crawl results
//!
//! This module handles:
//! - Writing the per-kind JSON datasets
//! - Generating the image map module from the image directory
//! - Summarizing each crawl in a report

mod dataset;
mod image_map;
mod report;

pub use dataset::{render_dataset, write_dataset, Dataset};
pub use image_map::{collect_image_map, render_image_map, write_image_map, ImageMap};
pub use report::{log_report, CrawlReport};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
