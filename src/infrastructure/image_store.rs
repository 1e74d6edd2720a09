//! Filesystem implementation of ImageStorage

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, ImageStorage};

/// Stores images as flat files inside one directory
pub struct FsImageStorage {
    dir: PathBuf,
}

impl FsImageStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a stored filename, refusing anything that is not a bare file name.
    fn path_for(&self, filename: &str) -> Result<PathBuf, DomainError> {
        let bare = Path::new(filename)
            .file_name()
            .is_some_and(|name| name == filename);
        if !bare {
            return Err(DomainError::Storage(format!(
                "invalid image filename '{}'",
                filename
            )));
        }
        Ok(self.dir.join(filename))
    }
}

#[async_trait]
impl ImageStorage for FsImageStorage {
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String, DomainError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = format!("{}.{}", uuid::Uuid::new_v4().simple(), extension);
        let path = self.path_for(&filename)?;
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Stored image {:?} ({} bytes)", path, bytes.len());
        Ok(filename)
    }

    async fn remove(&self, filename: &str) -> Result<(), DomainError> {
        let path = self.path_for(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Removed image {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Image {:?} was already gone", path);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, filename: &str) -> bool {
        match self.path_for(filename) {
            Ok(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}
