//! Sequential upload pipeline
//!
//! Walks the not-yet-uploaded attachments in selection order, building
//! and sending one multipart request at a time. Sequential on purpose:
//! at most one request in flight, partial failure is well-defined (items
//! before the failure stay uploaded, the failing item and everything
//! after stay pending), and the frame receives photos in display order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use mb_attachments::loader::AttachmentLoader;
use mb_attachments::model::{Attachment, LoadState};
use mb_attachments::source::AssetSource;
use mb_attachments::tags::PersonTags;
use mb_core::{format_capture_date, UploadConfig};

use crate::metadata::{Media, UploadMetadata};
use crate::multipart::{generate_boundary, MultipartBody};
use crate::resize::resize_for_upload;
use crate::transport::{Transport, TransportError};

/// Why a batch upload aborted.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("the image has not finished processing")]
    ImageNotProcessed,
    #[error("the image could not be resized for upload")]
    UnableToResizeImage,
    #[error("upload metadata could not be encoded: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type UploadResult<T> = Result<T, UploadError>;

/// Uploads batches of attachments to the frame's ingest endpoint.
pub struct UploadPipeline<S, T> {
    loader: AttachmentLoader<S>,
    transport: Arc<T>,
    config: UploadConfig,
    uploading: AtomicBool,
}

impl<S: AssetSource, T: Transport> UploadPipeline<S, T> {
    pub fn new(loader: AttachmentLoader<S>, transport: Arc<T>, config: UploadConfig) -> Self {
        Self {
            loader,
            transport,
            config,
            uploading: AtomicBool::new(false),
        }
    }

    /// Whether a batch is currently in flight: true from the first item
    /// until the last item completes or a failure aborts the batch.
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    /// Uploads every not-yet-uploaded attachment, sequentially, in the
    /// given order.
    ///
    /// On failure the remaining items are left untouched and the first
    /// error is surfaced as the batch result; attachments uploaded before
    /// the failure stay uploaded. Calling again with an all-uploaded
    /// batch sends nothing and succeeds.
    #[instrument(skip_all, fields(total = attachments.len()))]
    pub async fn upload_all(
        &self,
        attachments: &[Arc<Attachment>],
        tags: &PersonTags,
    ) -> UploadResult<()> {
        self.uploading.store(true, Ordering::SeqCst);
        let result = self.upload_batch(attachments, tags).await;
        self.uploading.store(false, Ordering::SeqCst);
        result
    }

    async fn upload_batch(
        &self,
        attachments: &[Arc<Attachment>],
        tags: &PersonTags,
    ) -> UploadResult<()> {
        for attachment in attachments {
            if attachment.is_uploaded().await {
                continue;
            }
            self.upload_one(attachment, tags).await?;
            attachment.mark_uploaded().await;
            info!(id = %attachment.id(), "attachment uploaded");
        }
        Ok(())
    }

    async fn upload_one(&self, attachment: &Attachment, tags: &PersonTags) -> UploadResult<()> {
        let people = tags.for_attachment(attachment.id());
        let capture_date = self
            .loader
            .capture_date(attachment)
            .await
            .unwrap_or(self.config.default_capture_date);

        let snapshot = attachment.snapshot().await;
        let metadata = UploadMetadata {
            update_display_immediately: self.config.update_display_immediately,
            media: Media::new(
                format_capture_date(capture_date),
                snapshot.description,
                people,
            ),
        };

        let loaded = match snapshot.load {
            LoadState::Loaded(loaded) => loaded,
            _ => return Err(UploadError::ImageNotProcessed),
        };

        let image = resize_for_upload(&loaded.decoded, self.config.target_width)?;
        let metadata_json = serde_json::to_vec(&metadata)?;
        let body = MultipartBody::build(generate_boundary(), &metadata_json, &image);

        self.transport
            .post_multipart(&self.config.endpoint, body.boundary(), body.body())
            .await?;
        Ok(())
    }
}
