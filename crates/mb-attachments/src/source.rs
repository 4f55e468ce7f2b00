//! Asset source abstraction
//!
//! The OS photo library is reduced to a narrow seam: raw bytes plus an
//! optional creation date for an opaque identifier. A directory-backed
//! source covers desktop use; the in-memory source backs tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Asset source errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset unavailable: {0}")]
    Unavailable(String),
}

pub type AssetResult<T> = Result<T, AssetError>;

/// Supplier of photo bytes and capture dates, keyed by opaque identifier.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the raw bytes for an asset.
    async fn fetch_bytes(&self, id: &str) -> AssetResult<Bytes>;

    /// The photo's original creation date, if the library knows it.
    async fn fetch_creation_date(&self, id: &str) -> Option<NaiveDate>;
}

/// In-memory asset source for testing.
///
/// Counts fetches so tests can assert that duplicate load triggers
/// collapse into a single underlying fetch.
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    assets: tokio::sync::RwLock<HashMap<String, (Bytes, Option<NaiveDate>)>>,
    fetches: AtomicUsize,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(
        &self,
        id: impl Into<String>,
        bytes: impl Into<Bytes>,
        creation_date: Option<NaiveDate>,
    ) {
        let mut assets = self.assets.write().await;
        assets.insert(id.into(), (bytes.into(), creation_date));
    }

    /// Number of `fetch_bytes` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetSource for MemoryAssetSource {
    async fn fetch_bytes(&self, id: &str) -> AssetResult<Bytes> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let assets = self.assets.read().await;
        assets
            .get(id)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| AssetError::Unavailable(id.to_string()))
    }

    async fn fetch_creation_date(&self, id: &str) -> Option<NaiveDate> {
        let assets = self.assets.read().await;
        assets.get(id).and_then(|(_, date)| *date)
    }
}

/// Asset source backed by a directory of image files.
///
/// Identifiers are relative paths under the root; the creation date comes
/// from the file's modification time.
pub struct DirectoryAssetSource {
    root: PathBuf,
}

impl DirectoryAssetSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve an identifier to a path, rejecting traversal outside the root.
    fn resolve(&self, id: &str) -> AssetResult<PathBuf> {
        if id.contains("..") || id.starts_with('/') || id.starts_with('\\') {
            return Err(AssetError::Unavailable(id.to_string()));
        }
        Ok(self.root.join(id))
    }
}

#[async_trait]
impl AssetSource for DirectoryAssetSource {
    async fn fetch_bytes(&self, id: &str) -> AssetResult<Bytes> {
        let path = self.resolve(id)?;
        let data = fs::read(&path)
            .await
            .map_err(|e| AssetError::Unavailable(format!("{id}: {e}")))?;
        debug!(id = %id, size = data.len(), "asset read");
        Ok(Bytes::from(data))
    }

    async fn fetch_creation_date(&self, id: &str) -> Option<NaiveDate> {
        let path = self.resolve(id).ok()?;
        let metadata = fs::metadata(&path).await.ok()?;
        let modified = metadata.modified().ok()?;
        Some(DateTime::<Utc>::from(modified).date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_source_serves_bytes_and_counts_fetches() {
        let source = MemoryAssetSource::new();
        source.insert("photo-1", &b"bytes"[..], None).await;

        assert_eq!(source.fetch_bytes("photo-1").await.unwrap(), &b"bytes"[..]);
        assert_eq!(source.fetch_bytes("photo-1").await.unwrap(), &b"bytes"[..]);
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn memory_source_reports_missing_assets() {
        let source = MemoryAssetSource::new();
        let err = source.fetch_bytes("missing").await.unwrap_err();
        assert_eq!(err, AssetError::Unavailable("missing".to_string()));
        assert_eq!(source.fetch_creation_date("missing").await, None);
    }

    #[tokio::test]
    async fn directory_source_reads_relative_ids() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"jpeg bytes").unwrap();

        let source = DirectoryAssetSource::new(dir.path());
        let bytes = source.fetch_bytes("photo.jpg").await.unwrap();
        assert_eq!(bytes, &b"jpeg bytes"[..]);
        assert!(source.fetch_creation_date("photo.jpg").await.is_some());
    }

    #[tokio::test]
    async fn directory_source_rejects_missing_and_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryAssetSource::new(dir.path());

        assert!(source.fetch_bytes("absent.jpg").await.is_err());
        assert!(source.fetch_bytes("../escape.jpg").await.is_err());
        assert_eq!(source.fetch_creation_date("../escape.jpg").await, None);
    }
}
