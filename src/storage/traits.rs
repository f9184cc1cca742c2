//! Storage traits and error types
//!
//! This module defines the trait interface for image cache backends and
//! associated error types.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image file name: {0:?}")]
    InvalidName(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for image cache implementations
///
/// Images are addressed by their derived filename only; a name that is
/// already present is never downloaded again.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Checks whether an image with this filename is already cached
    async fn contains(&self, file_name: &str) -> StorageResult<bool>;

    /// Stores image bytes under the filename
    ///
    /// # Returns
    ///
    /// The path the image was written to
    async fn put(&self, file_name: &str, bytes: &[u8]) -> StorageResult<PathBuf>;

    /// The path an image with this filename is stored at
    fn path_for(&self, file_name: &str) -> StorageResult<PathBuf>;
}

/// Rejects names that could escape the image directory
pub fn validate_file_name(file_name: &str) -> StorageResult<()> {
    let invalid = file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains('\0');

    if invalid {
        Err(StorageError::InvalidName(file_name.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_file_name("Crowbar.png").is_ok());
        assert!(validate_file_name("Soldier'sSyringe.png").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", ".", "..", "../x.png", "a/b.png", "a\\b.png"] {
            assert!(
                matches!(validate_file_name(name), Err(StorageError::InvalidName(_))),
                "{} should be rejected",
                name
            );
        }
    }
}
