//! Storage module for the image cache
//!
//! Downloaded images are cached by filename so repeated crawls skip images
//! that are already present. Dataset JSON is not stored here; it is always
//! regenerated in full by the output module.

mod fs;
mod traits;

pub use fs::FsImageStore;
pub use traits::{validate_file_name, ImageStore, StorageError, StorageResult};

use std::path::Path;
use std::sync::Arc;

/// Opens the image directory as a shared image store
///
/// # Arguments
///
/// * `dir` - The image directory, created if absent
pub fn open_image_store(dir: &Path) -> StorageResult<Arc<dyn ImageStore>> {
    Ok(Arc::new(FsImageStore::open(dir)?))
}
