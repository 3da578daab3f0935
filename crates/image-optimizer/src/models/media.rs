use bytes::Bytes;
use image::DynamicImage;
use std::fmt;

use super::format::OutputFormat;

/// Positive pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// `None` if either side is zero
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel buffer plus the format whose decoder produced it
pub struct DecodedImage {
    pub image: DynamicImage,
    pub detected_format: OutputFormat,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("detected_format", &self.detected_format)
            .finish()
    }
}

/// Value of the `X-Cache` response header
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr, strum::IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_static_str(self) -> &'static str {
        self.into()
    }
}

/// Encoded bytes ready to serve
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub data: Bytes,
    pub format: OutputFormat,
    pub cache_status: CacheStatus,
    pub entry_name: String,
}

impl OptimizedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_reject_zero() {
        assert!(Dimensions::new(0, 10).is_none());
        assert!(Dimensions::new(10, 0).is_none());
        assert_eq!(Dimensions::new(3, 4).unwrap().to_string(), "3x4");
    }

    #[test]
    fn test_cache_status_header_values() {
        assert_eq!(CacheStatus::Hit.as_ref(), "HIT");
        assert_eq!(CacheStatus::Miss.to_string(), "MISS");
        assert_eq!(CacheStatus::Miss.as_static_str(), "MISS");
    }
}
