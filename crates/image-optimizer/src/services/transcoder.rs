//! Resize and re-encode decoded images
//!
//! Encoding policy per format:
//! - JPEG: lossy at the requested quality
//! - PNG: lossless, best compression
//! - WebP: lossless, quality ignored

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::borrow::Cow;

use crate::errors::{TransformError, TransformResult};
use crate::models::{Dimensions, OutputFormat};

/// Resample to `dimensions` with Lanczos3; borrows the input when nothing changes
pub fn resize(image: &DynamicImage, dimensions: Dimensions) -> Cow<'_, DynamicImage> {
    if image.width() == dimensions.width && image.height() == dimensions.height {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(image.resize_exact(dimensions.width, dimensions.height, FilterType::Lanczos3))
    }
}

/// Encode `image` as `format`, resizing first when `dimensions` is given
///
/// Quality only applies to JPEG. It is saturated into `0..=100` and the codec
/// clamps the low end further.
pub fn encode(
    image: &DynamicImage,
    format: OutputFormat,
    quality: i32,
    dimensions: Option<Dimensions>,
) -> TransformResult<Vec<u8>> {
    let image = match dimensions {
        Some(dimensions) => resize(image, dimensions),
        None => Cow::Borrowed(image),
    };

    let mut bytes = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            let rgb = image.to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(quality)).write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
        }
        OutputFormat::Png => image.write_with_encoder(PngEncoder::new_with_quality(
            &mut bytes,
            CompressionType::Best,
            PngFilter::Adaptive,
        )),
        OutputFormat::Webp => {
            let rgba = image.to_rgba8();
            WebPEncoder::new_lossless(&mut bytes).write_image(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
            )
        }
    };

    result.map_err(|e| TransformError::encode(format.as_ref(), e))?;
    Ok(bytes)
}

fn jpeg_quality(quality: i32) -> u8 {
    quality.clamp(0, 100) as u8
}
