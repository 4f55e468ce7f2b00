//! Attachment loader
//!
//! Drives each attachment's load state machine: one asset fetch per
//! attachment, decoded into the preview and upload artifacts.

use std::sync::Arc;

use bytes::Bytes;
use chrono::NaiveDate;
use image::imageops::FilterType;
use tracing::{debug, instrument, warn};

use mb_core::PREVIEW_MAX_DIMENSION;

use crate::model::{Attachment, LoadError, LoadedImage};
use crate::source::AssetSource;

/// Loads attachment bytes from an [`AssetSource`] and applies the
/// resulting state transitions.
pub struct AttachmentLoader<S> {
    source: Arc<S>,
}

impl<S> Clone for AttachmentLoader<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: AssetSource> AttachmentLoader<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Loads the photo behind an attachment. Idempotent: a no-op while a
    /// load is in flight or already finished; a `Failed` attachment is
    /// retried.
    ///
    /// The asset fetch is the only suspension point. The record is
    /// updated atomically on entry (`Loading`) and once more with the
    /// terminal state, so concurrent observers never see a torn update.
    #[instrument(skip_all, fields(id = %attachment.id()))]
    pub async fn load(&self, attachment: &Attachment) {
        if !attachment.begin_loading().await {
            return;
        }

        match self.source.fetch_bytes(attachment.id()).await {
            Ok(bytes) => match decode(bytes) {
                Ok(loaded) => {
                    debug!(size = loaded.original.len(), "attachment loaded");
                    attachment.finish_loading(loaded).await;
                }
                Err(error) => {
                    warn!(%error, "attachment bytes could not be decoded");
                    attachment.fail_loading(error).await;
                }
            },
            Err(error) => {
                warn!(%error, "asset fetch failed");
                attachment.fail_loading(LoadError::Asset(error)).await;
            }
        }
    }

    /// The photo's original creation date, formatted downstream for the
    /// upload metadata.
    ///
    /// Absent when the source has no date for the asset or the attachment
    /// never reached `Loaded`. Independent of the load transitions and
    /// callable repeatedly.
    pub async fn capture_date(&self, attachment: &Attachment) -> Option<NaiveDate> {
        if !attachment.load_state().await.is_loaded() {
            return None;
        }
        self.source.fetch_creation_date(attachment.id()).await
    }
}

/// Decode fetched bytes into the display preview and upload artifacts.
fn decode(bytes: Bytes) -> Result<LoadedImage, LoadError> {
    let decoded =
        image::load_from_memory(&bytes).map_err(|_| LoadError::ContentTypeNotSupported)?;
    let preview = decoded.resize(
        PREVIEW_MAX_DIMENSION,
        PREVIEW_MAX_DIMENSION,
        FilterType::Lanczos3,
    );
    Ok(LoadedImage {
        preview,
        original: bytes,
        decoded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoadState;
    use crate::source::{AssetError, MemoryAssetSource};
    use image::GenericImageView;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Bytes {
        let image = image::DynamicImage::new_rgb8(width, height);
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        Bytes::from(buffer.into_inner())
    }

    async fn loader_with_photo(id: &str, bytes: Bytes) -> AttachmentLoader<MemoryAssetSource> {
        let source = MemoryAssetSource::new();
        source.insert(id, bytes, None).await;
        AttachmentLoader::new(Arc::new(source))
    }

    #[tokio::test]
    async fn load_decodes_bytes_and_builds_preview() {
        let bytes = png_bytes(640, 400);
        let loader = loader_with_photo("photo-1", bytes.clone()).await;
        let attachment = Attachment::new("photo-1");

        loader.load(&attachment).await;

        match attachment.load_state().await {
            LoadState::Loaded(loaded) => {
                assert_eq!(loaded.original, bytes);
                assert_eq!(loaded.decoded.dimensions(), (640, 400));
                let (pw, ph) = loaded.preview.dimensions();
                assert!(pw <= PREVIEW_MAX_DIMENSION && ph <= PREVIEW_MAX_DIMENSION);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_bytes_fail_with_content_type_error() {
        let loader = loader_with_photo("photo-1", Bytes::from_static(b"not an image")).await;
        let attachment = Attachment::new("photo-1");

        loader.load(&attachment).await;

        assert!(matches!(
            attachment.load_state().await,
            LoadState::Failed(LoadError::ContentTypeNotSupported)
        ));
    }

    #[tokio::test]
    async fn missing_asset_fails_with_source_error() {
        let loader = AttachmentLoader::new(Arc::new(MemoryAssetSource::new()));
        let attachment = Attachment::new("gone");

        loader.load(&attachment).await;

        assert!(matches!(
            attachment.load_state().await,
            LoadState::Failed(LoadError::Asset(AssetError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn concurrent_loads_collapse_into_one_fetch() {
        let source = Arc::new(MemoryAssetSource::new());
        source.insert("photo-1", png_bytes(8, 8), None).await;
        let loader = AttachmentLoader::new(Arc::clone(&source));
        let attachment = Attachment::new("photo-1");

        tokio::join!(loader.load(&attachment), loader.load(&attachment));

        assert_eq!(source.fetch_count(), 1);
        assert!(attachment.load_state().await.is_loaded());
    }

    #[tokio::test]
    async fn loading_is_idempotent_once_loaded() {
        let source = Arc::new(MemoryAssetSource::new());
        source.insert("photo-1", png_bytes(8, 8), None).await;
        let loader = AttachmentLoader::new(Arc::clone(&source));
        let attachment = Attachment::new("photo-1");

        loader.load(&attachment).await;
        loader.load(&attachment).await;

        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn failed_load_retries_on_next_trigger() {
        let source = Arc::new(MemoryAssetSource::new());
        let loader = AttachmentLoader::new(Arc::clone(&source));
        let attachment = Attachment::new("photo-1");

        // First attempt fails: the asset is not there yet.
        loader.load(&attachment).await;
        assert!(attachment.load_state().await.is_failed());

        source.insert("photo-1", png_bytes(8, 8), None).await;
        loader.load(&attachment).await;
        assert!(attachment.load_state().await.is_loaded());
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn capture_date_requires_a_loaded_attachment() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        let source = Arc::new(MemoryAssetSource::new());
        source.insert("photo-1", png_bytes(8, 8), Some(date)).await;
        let loader = AttachmentLoader::new(Arc::clone(&source));
        let attachment = Attachment::new("photo-1");

        assert_eq!(loader.capture_date(&attachment).await, None);

        loader.load(&attachment).await;
        assert_eq!(loader.capture_date(&attachment).await, Some(date));
        // Callable repeatedly without affecting load state.
        assert_eq!(loader.capture_date(&attachment).await, Some(date));
    }

    #[tokio::test]
    async fn capture_date_is_absent_when_source_has_none() {
        let loader = loader_with_photo("photo-1", png_bytes(8, 8)).await;
        let attachment = Attachment::new("photo-1");

        loader.load(&attachment).await;
        assert_eq!(loader.capture_date(&attachment).await, None);
    }
}
