//! On-disk preview cache.
//!
//! [`PreviewCache::get_or_create`] returns the bytes of a stored file's
//! preview, rendering and persisting it on first request. With
//! [`CacheKey::Filename`] an existing preview is reused for as long as it
//! exists on disk, even if the original has since been replaced; with
//! [`CacheKey::ContentHash`] the cache entry follows the original's bytes.

pub mod locks;

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::config::settings::{CacheKey, PreviewSettings};
use crate::error::{CoreError, CoreResult};
use crate::fs::ops::{partial_path, stored_path};
use crate::fs::preview::render_preview;

pub use locks::KeyedLocks;

/// Generate-or-reuse access to the preview directory.
#[derive(Debug)]
pub struct PreviewCache {
    source_dir: PathBuf,
    cache_dir: PathBuf,
    settings: PreviewSettings,
    locks: KeyedLocks,
}

impl PreviewCache {
    pub fn new(source_dir: PathBuf, cache_dir: PathBuf, settings: PreviewSettings) -> Self {
        Self {
            source_dir,
            cache_dir,
            settings: settings.normalized(),
            locks: KeyedLocks::new(),
        }
    }

    pub fn settings(&self) -> &PreviewSettings {
        &self.settings
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path the preview of `name` is (or will be) cached at.
    ///
    /// In content-hash mode this reads the whole original.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidName`] if `name` is not a flat file name.
    /// - [`CoreError::NotFound`] in content-hash mode when the original is missing.
    pub async fn cache_path(&self, name: &str) -> CoreResult<PathBuf> {
        match self.settings.cache_key {
            CacheKey::Filename => stored_path(&self.cache_dir, name),
            CacheKey::ContentHash => {
                let source = stored_path(&self.source_dir, name)?;
                let content = tokio::fs::read(&source)
                    .await
                    .map_err(|e| CoreError::from_io(&source, e))?;
                Ok(self.cache_dir.join(format!("{}.jpg", self.digest(&content))))
            }
        }
    }

    /// Returns the preview bytes for the stored file `name`.
    ///
    /// On a cache miss the original is decoded, cover-fitted into the
    /// configured square, JPEG-encoded, written next to the other previews
    /// and read back. Concurrent calls for the same cache entry are
    /// serialized so the preview is rendered once.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidName`] if `name` is not a flat file name.
    /// - [`CoreError::NotFound`] if the original is missing on a cache miss.
    /// - [`CoreError::UnknownFormat`] / [`CoreError::Decode`] for unusable originals.
    /// - [`CoreError::Io`] if the preview cannot be written or read.
    pub async fn get_or_create(&self, name: &str) -> CoreResult<Vec<u8>> {
        let target = self.cache_path(name).await?;
        let key = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());

        let _guard = self.locks.lock(&key).await;

        if tokio::fs::try_exists(&target).await? {
            tracing::trace!(name, "preview cache hit");
        } else {
            let source = stored_path(&self.source_dir, name)?;
            let bytes = self.render(source).await?;
            self.persist(&key, &target, &bytes).await?;
            tracing::debug!(name, preview = %target.display(), "generated preview");
        }

        tokio::fs::read(&target)
            .await
            .map_err(|e| CoreError::from_io(&target, e))
    }

    async fn render(&self, source: PathBuf) -> CoreResult<Vec<u8>> {
        let size = self.settings.size;
        let quality = self.settings.quality;
        tokio::task::spawn_blocking(move || render_preview(&source, size, quality))
            .await
            .map_err(|e| CoreError::Io(std::io::Error::other(e)))?
    }

    /// Writes to a sibling temp file and renames it into place so readers
    /// never see a half-written preview.
    async fn persist(&self, key: &str, target: &Path, bytes: &[u8]) -> CoreResult<()> {
        let partial = partial_path(&self.cache_dir, key)?;
        tokio::fs::write(&partial, bytes)
            .await
            .map_err(|e| CoreError::from_io(&partial, e))?;
        tokio::fs::rename(&partial, target).await?;
        Ok(())
    }

    fn digest(&self, content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        hasher.update(self.settings.size.to_le_bytes());
        hasher.update([self.settings.quality]);
        format!("{:x}", hasher.finalize())
    }
}
