//! # Image Stores
//!
//! [`ImageStore`] implementations.
//!
//! [`FileImageStore`] keeps the slot at a fixed path and writes through a
//! sibling temp file followed by a rename, so readers see either the old
//! image or the new one and never a partial write.

use crate::infrastructure::rendering::error::RenderResult;
use crate::infrastructure::rendering::traits::ImageStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// File-backed image slot.
#[derive(Debug, Clone)]
pub struct FileImageStore {
    path: PathBuf,
}

impl FileImageStore {
    /// Creates a store for the slot at `path`. Nothing is touched until the
    /// first `put`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the slot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ImageStore for FileImageStore {
    async fn put(&self, image: Bytes) -> RenderResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &image).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(path = %self.path.display(), bytes = image.len(), "stored summary image");
        Ok(())
    }

    async fn get(&self) -> RenderResult<Option<Bytes>> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory image slot, used in tests and when no image path is configured.
#[derive(Debug, Clone, Default)]
pub struct InMemoryImageStore {
    slot: Arc<RwLock<Option<Bytes>>>,
}

impl InMemoryImageStore {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn put(&self, image: Bytes) -> RenderResult<()> {
        *self.slot.write().await = Some(image);
        Ok(())
    }

    async fn get(&self) -> RenderResult<Option<Bytes>> {
        Ok(self.slot.read().await.clone())
    }
}
