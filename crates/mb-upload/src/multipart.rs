//! Multipart body construction
//!
//! Each upload request carries exactly two parts: the metadata JSON and
//! the resized JPEG, separated by a boundary token generated fresh per
//! request.

use bytes::Bytes;
use uuid::Uuid;

/// Filename reported for the image part.
const UPLOAD_FILENAME: &str = "image.jpg";

/// A fresh boundary token, unique per request.
pub fn generate_boundary() -> String {
    format!("Boundary-{}", Uuid::new_v4())
}

/// An assembled `multipart/form-data` request body.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    bytes: Bytes,
}

impl MultipartBody {
    /// Builds the two-part body: `metadata` (JSON) and `file` (JPEG,
    /// filename `image.jpg`), each part terminated by `\r\n`, the final
    /// boundary suffixed `--`.
    pub fn build(boundary: impl Into<String>, metadata_json: &[u8], image: &[u8]) -> Self {
        let boundary = boundary.into();
        let mut body = Vec::with_capacity(metadata_json.len() + image.len() + 512);

        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"metadata\"\r\n");
        body.extend_from_slice(
            format!("Content-Type: {}\r\n\r\n", mime::APPLICATION_JSON).as_bytes(),
        );
        body.extend_from_slice(metadata_json);
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{UPLOAD_FILENAME}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime::IMAGE_JPEG).as_bytes());
        body.extend_from_slice(image);
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Self {
            boundary,
            bytes: Bytes::from(body),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The request `Content-Type` header value for this body.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn body(&self) -> Bytes {
        self.bytes.clone()
    }
}
