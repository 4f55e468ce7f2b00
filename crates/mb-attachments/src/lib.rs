//! # mb-attachments
//!
//! Attachment lifecycle for MemoryBox RS.
//!
//! A selection of photo identifiers is reconciled into [`Attachment`]
//! records by the [`AttachmentStore`]; each record is driven through its
//! load state machine by the [`AttachmentLoader`], which fetches bytes
//! from an [`AssetSource`]. Person tags live alongside in [`PersonTags`],
//! keyed by the same stable identifiers.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mb_attachments::{AttachmentLoader, AttachmentStore, MemoryAssetSource};
//!
//! let mut store = AttachmentStore::new();
//! let attachments = store.reconcile(&["photo-1".into(), "photo-2".into()]);
//!
//! let loader = AttachmentLoader::new(Arc::new(MemoryAssetSource::new()));
//! for attachment in &attachments {
//!     loader.load(attachment).await;
//! }
//! ```

pub mod loader;
pub mod model;
pub mod source;
pub mod store;
pub mod tags;

pub use loader::AttachmentLoader;
pub use model::{
    AlreadyUploaded, Attachment, AttachmentSnapshot, LoadError, LoadState, LoadedImage,
};
pub use source::{AssetError, AssetResult, AssetSource, DirectoryAssetSource, MemoryAssetSource};
pub use store::AttachmentStore;
pub use tags::PersonTags;
