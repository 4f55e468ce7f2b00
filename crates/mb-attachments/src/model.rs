//! Attachment record and load state machine

use bytes::Bytes;
use image::DynamicImage;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::source::AssetError;

/// Why a photo failed to load. Recorded on the attachment; a later
/// `load` call retries from `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("content type is not a supported image format")]
    ContentTypeNotSupported,
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// The three artifacts of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Bounded thumbnail for list display.
    pub preview: DynamicImage,
    /// Raw bytes exactly as fetched from the asset source.
    pub original: Bytes,
    /// Fully decoded image, resized later for upload.
    pub decoded: DynamicImage,
}

/// Progress of fetching and decoding a photo's bytes.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    /// No load has been requested yet.
    #[default]
    NotLoaded,
    /// A fetch is in flight.
    Loading,
    /// Bytes fetched and decoded.
    Loaded(LoadedImage),
    /// The fetch or decode failed; retryable.
    Failed(LoadError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Attempted mutation of an attachment that has already been uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("attachment {id} is already uploaded and can no longer be edited")]
pub struct AlreadyUploaded {
    pub id: String,
}

/// Mutable fields of an attachment, updated as one unit per transition.
#[derive(Debug, Default)]
struct AttachmentRecord {
    load: LoadState,
    description: String,
    uploaded: bool,
}

/// One selected photo: its stable identifier, load state, user-entered
/// description, and upload flag.
///
/// Shared as `Arc<Attachment>` between the store's cache, the active
/// selection, and in-flight loads. All mutable state sits behind a single
/// lock so observers never see a half-applied transition.
#[derive(Debug)]
pub struct Attachment {
    id: String,
    record: RwLock<AttachmentRecord>,
}

/// Point-in-time copy of an attachment's mutable fields.
#[derive(Debug, Clone)]
pub struct AttachmentSnapshot {
    pub load: LoadState,
    pub description: String,
    pub uploaded: bool,
}

impl Attachment {
    /// Creates an attachment in `NotLoaded` for the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            record: RwLock::new(AttachmentRecord::default()),
        }
    }

    /// Stable identifier from the photo source.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn load_state(&self) -> LoadState {
        self.record.read().await.load.clone()
    }

    pub async fn is_uploaded(&self) -> bool {
        self.record.read().await.uploaded
    }

    pub async fn description(&self) -> String {
        self.record.read().await.description.clone()
    }

    /// Consistent copy of all mutable fields under one lock acquisition.
    pub async fn snapshot(&self) -> AttachmentSnapshot {
        let record = self.record.read().await;
        AttachmentSnapshot {
            load: record.load.clone(),
            description: record.description.clone(),
            uploaded: record.uploaded,
        }
    }

    /// Updates the user-entered description. Rejected once uploaded.
    pub async fn set_description(
        &self,
        description: impl Into<String>,
    ) -> Result<(), AlreadyUploaded> {
        let mut record = self.record.write().await;
        if record.uploaded {
            return Err(AlreadyUploaded {
                id: self.id.clone(),
            });
        }
        record.description = description.into();
        Ok(())
    }

    /// Records a successful upload. Monotonic: never cleared.
    ///
    /// The caller must have verified the attachment is `Loaded`; an
    /// attachment can only be uploaded after a successful load and send.
    pub async fn mark_uploaded(&self) {
        let mut record = self.record.write().await;
        debug_assert!(record.load.is_loaded());
        record.uploaded = true;
    }

    /// Claims the load slot: transitions to `Loading` and returns true,
    /// or returns false when a load is in flight or already finished.
    ///
    /// Guard and transition happen under one write lock, so concurrent
    /// duplicate triggers collapse into a single fetch.
    pub(crate) async fn begin_loading(&self) -> bool {
        let mut record = self.record.write().await;
        match record.load {
            LoadState::Loading | LoadState::Loaded(_) => false,
            LoadState::NotLoaded | LoadState::Failed(_) => {
                record.load = LoadState::Loading;
                true
            }
        }
    }

    pub(crate) async fn finish_loading(&self, loaded: LoadedImage) {
        let mut record = self.record.write().await;
        record.load = LoadState::Loaded(loaded);
    }

    pub(crate) async fn fail_loading(&self, error: LoadError) {
        let mut record = self.record.write().await;
        record.load = LoadState::Failed(error);
    }
}
