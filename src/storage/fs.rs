use crate::storage::traits::{validate_file_name, ImageStore, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Image cache backed by a plain directory
#[derive(Debug, Clone)]
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    /// Opens the image directory, creating it if absent
    pub fn open(dir: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn contains(&self, file_name: &str) -> StorageResult<bool> {
        let path = self.path_for(file_name)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    async fn put(&self, file_name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        let path = self.path_for(file_name)?;
        let temp = self.dir.join(format!(".{}.part", file_name));

        tokio::fs::write(&temp, bytes).await?;
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        tracing::debug!("Stored {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    fn path_for(&self, file_name: &str) -> StorageResult<PathBuf> {
        validate_file_name(file_name)?;
        Ok(self.dir.join(file_name))
    }
}
