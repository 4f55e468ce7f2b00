//! Upload configuration and policy constants
//!
//! The frame's display geometry and the upload policy are fixed for a
//! given deployment, so they live here as named constants rather than
//! literals scattered through the pipeline. There is no config file;
//! the embedding app constructs an [`UploadConfig`] directly.

use chrono::NaiveDate;
use url::Url;

/// Width in pixels of the frame's e-paper display.
pub const FRAME_DISPLAY_WIDTH: u32 = 800;

/// Height in pixels of the frame's e-paper display.
pub const FRAME_DISPLAY_HEIGHT: u32 = 480;

/// Target width for images re-encoded for upload.
pub const UPLOAD_TARGET_WIDTH: u32 = FRAME_DISPLAY_WIDTH;

/// JPEG quality used when re-encoding an image for upload (maximum).
pub const UPLOAD_JPEG_QUALITY: u8 = 100;

/// Bounding dimension for the display preview generated on load.
pub const PREVIEW_MAX_DIMENSION: u32 = 256;

/// Default ingest endpoint of the frame on the local network.
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "http://192.168.1.8:2358/media-direct-upload";

/// Capture date used when the photo library has no creation date for an
/// asset. A fixed, documented fallback rather than the current date, so
/// undated photos sort together predictably on the frame.
pub fn default_capture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 10, 8).unwrap_or_default()
}

/// Format a capture date the way the frame's ingest service expects it.
pub fn format_capture_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Settings for one upload pipeline instance.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Where multipart upload requests are POSTed.
    pub endpoint: Url,
    /// Width images are resized toward before upload.
    pub target_width: u32,
    /// Date used for assets with no resolvable creation date.
    pub default_capture_date: NaiveDate,
    /// Whether the frame should show the photo as soon as it arrives.
    pub update_display_immediately: bool,
}

impl UploadConfig {
    /// Config pointing at a specific ingest endpoint, other settings
    /// at their policy defaults.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            target_width: UPLOAD_TARGET_WIDTH,
            default_capture_date: default_capture_date(),
            update_display_immediately: true,
        }
    }

    /// Config for the stock frame deployment on the local network.
    pub fn standard() -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(DEFAULT_UPLOAD_ENDPOINT)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_is_well_formed() {
        let config = UploadConfig::standard().unwrap();
        assert_eq!(config.endpoint.as_str(), DEFAULT_UPLOAD_ENDPOINT);
        assert_eq!(config.target_width, 800);
        assert!(config.update_display_immediately);
    }

    #[test]
    fn fallback_date_formats_as_expected() {
        assert_eq!(format_capture_date(default_capture_date()), "2020-10-08");
    }

    #[test]
    fn new_overrides_only_the_endpoint() {
        let url = Url::parse("http://frame.local:2358/media-direct-upload").unwrap();
        let config = UploadConfig::new(url.clone());
        assert_eq!(config.endpoint, url);
        assert_eq!(config.target_width, UPLOAD_TARGET_WIDTH);
        assert_eq!(config.default_capture_date, default_capture_date());
    }
}
