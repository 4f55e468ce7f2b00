//! # mb-upload
//!
//! Upload pipeline for MemoryBox RS.
//!
//! Consumes loaded attachments from `mb-attachments`, builds a multipart
//! payload per photo (wire-exact metadata JSON plus a resized JPEG), and
//! POSTs each payload to the frame's ingest endpoint via a [`Transport`].
//! Uploads run sequentially: at most one request in flight, and a failure
//! aborts the rest of the batch while keeping earlier successes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mb_core::UploadConfig;
//! use mb_upload::{HttpTransport, UploadPipeline};
//!
//! let pipeline = UploadPipeline::new(
//!     loader,
//!     Arc::new(HttpTransport::new()),
//!     UploadConfig::standard()?,
//! );
//! pipeline.upload_all(store.active(), &tags).await?;
//! ```

pub mod metadata;
pub mod multipart;
pub mod pipeline;
pub mod resize;
pub mod transport;

pub use metadata::{Media, UploadMetadata};
pub use multipart::{generate_boundary, MultipartBody};
pub use pipeline::{UploadError, UploadPipeline, UploadResult};
pub use resize::resize_for_upload;
pub use transport::{
    HttpTransport, MemoryTransport, RecordedRequest, Transport, TransportError,
};
