//! Image resizing for upload
//!
//! Photos are re-encoded onto the frame's fixed display geometry before
//! upload; the frame renders what it receives without scaling.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::warn;

use mb_core::{FRAME_DISPLAY_HEIGHT, FRAME_DISPLAY_WIDTH, UPLOAD_JPEG_QUALITY};

use crate::pipeline::UploadError;

/// Scales an image toward the target width on the frame's display aspect
/// and re-encodes it as maximum-quality JPEG.
///
/// The height is derived from the display's width:height ratio; if that
/// derivation would exceed the width, the canvas is clamped square, so
/// the output is never portrait-oriented.
pub fn resize_for_upload(
    image: &DynamicImage,
    target_width: u32,
) -> Result<Vec<u8>, UploadError> {
    let mut target_height = target_width * FRAME_DISPLAY_HEIGHT / FRAME_DISPLAY_WIDTH;
    if target_height > target_width {
        target_height = target_width;
    }

    let resized = image
        .resize_exact(target_width, target_height, FilterType::Lanczos3)
        .to_rgb8();

    let mut encoded = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut encoded, UPLOAD_JPEG_QUALITY);
    encoder.encode_image(&resized).map_err(|error| {
        warn!(%error, "jpeg encoding failed");
        UploadError::UnableToResizeImage
    })?;
    Ok(encoded)
}
