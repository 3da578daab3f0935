//! Resolution specs (`WxH`, either side optionally `auto`) and planning them
//! against a decoded image's native size

use std::fmt;

use crate::config::TransformConfig;
use crate::config::defaults::{DEFAULT_MAX_DIMENSION, DEFAULT_MAX_PIXELS};
use crate::errors::{TransformError, TransformResult};
use crate::models::Dimensions;

const AUTO: &str = "auto";

/// Upper bounds on a planned output size
///
/// The resize buffer is allocated in one piece, so anything larger than this
/// is refused with `InvalidResolution` instead of being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionLimits {
    pub max_dimension: u32,
    pub max_pixels: u64,
}

impl Default for ResolutionLimits {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl From<&TransformConfig> for ResolutionLimits {
    fn from(config: &TransformConfig) -> Self {
        Self {
            max_dimension: config.max_dimension,
            max_pixels: config.max_pixels,
        }
    }
}

impl ResolutionLimits {
    fn check_side(&self, spec: &str, axis: &str, px: u32) -> TransformResult<()> {
        if px > self.max_dimension {
            return Err(TransformError::invalid_resolution(
                spec,
                format!("{axis} {px} exceeds the maximum of {}", self.max_dimension),
            ));
        }
        Ok(())
    }

    fn check(&self, spec: &str, dimensions: Dimensions) -> TransformResult<()> {
        self.check_side(spec, "width", dimensions.width)?;
        self.check_side(spec, "height", dimensions.height)?;

        let pixels = u64::from(dimensions.width) * u64::from(dimensions.height);
        if pixels > self.max_pixels {
            return Err(TransformError::invalid_resolution(
                spec,
                format!(
                    "{}x{} is {pixels} pixels, more than the maximum of {}",
                    dimensions.width, dimensions.height, self.max_pixels
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Auto,
    Pixels(u32),
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str(AUTO),
            Self::Pixels(px) => write!(f, "{px}"),
        }
    }
}

/// A validated resolution spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionSpec {
    pub width: Side,
    pub height: Side,
}

impl ResolutionSpec {
    /// Parse a raw spec
    ///
    /// Returns `Ok(None)` for the empty string (no resize). Whitespace around
    /// either side is ignored. Sides must be `auto` or a positive integer.
    pub fn parse(raw: &str) -> TransformResult<Option<Self>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let (width, height) = raw
            .split_once('x')
            .ok_or_else(|| TransformError::invalid_resolution(raw, "expected <width>x<height>"))?;

        Ok(Some(Self {
            width: parse_side(raw, "width", width)?,
            height: parse_side(raw, "height", height)?,
        }))
    }

    /// Reject numeric sides over `limits.max_dimension` before anything is fetched
    pub fn check_sides(&self, limits: &ResolutionLimits) -> TransformResult<()> {
        let spec = self.to_string();
        if let Side::Pixels(px) = self.width {
            limits.check_side(&spec, "width", px)?;
        }
        if let Side::Pixels(px) = self.height {
            limits.check_side(&spec, "height", px)?;
        }
        Ok(())
    }

    /// Concrete target dimensions for an image of `native_width` x `native_height`
    ///
    /// An `auto` side keeps the native aspect ratio, rounded to the nearest
    /// pixel and never below 1. Two numeric sides are used as given. The
    /// result must fit within `limits`.
    pub fn plan(
        &self,
        native_width: u32,
        native_height: u32,
        limits: &ResolutionLimits,
    ) -> TransformResult<Dimensions> {
        if native_width == 0 || native_height == 0 {
            return Err(TransformError::invalid_resolution(
                self.to_string(),
                format!("source image has zero dimension ({native_width}x{native_height})"),
            ));
        }

        let (width, height) = match (self.width, self.height) {
            (Side::Auto, Side::Auto) => (native_width, native_height),
            (Side::Auto, Side::Pixels(height)) => {
                (scale(height, native_width, native_height), height)
            }
            (Side::Pixels(width), Side::Auto) => {
                (width, scale(width, native_height, native_width))
            }
            (Side::Pixels(width), Side::Pixels(height)) => (width, height),
        };

        let dimensions = Dimensions::new(width, height).ok_or_else(|| {
            TransformError::invalid_resolution(self.to_string(), "planned a zero-sized image")
        })?;
        limits.check(&self.to_string(), dimensions)?;
        Ok(dimensions)
    }
}

impl fmt::Display for ResolutionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Plan straight from the raw spec; `Ok(None)` when there is nothing to resize
pub fn plan(
    raw: &str,
    native_width: u32,
    native_height: u32,
    limits: &ResolutionLimits,
) -> TransformResult<Option<Dimensions>> {
    ResolutionSpec::parse(raw)?
        .map(|spec| spec.plan(native_width, native_height, limits))
        .transpose()
}

fn parse_side(raw: &str, axis: &str, side: &str) -> TransformResult<Side> {
    let side = side.trim();
    if side == AUTO {
        return Ok(Side::Auto);
    }

    match side.parse::<u32>() {
        Ok(0) => Err(TransformError::invalid_resolution(
            raw,
            format!("{axis} must be greater than zero"),
        )),
        Ok(px) => Ok(Side::Pixels(px)),
        Err(_) => Err(TransformError::invalid_resolution(
            raw,
            format!("{axis} '{side}' is neither 'auto' nor a pixel count"),
        )),
    }
}

/// `round(known * numerator / denominator)`, at least 1
fn scale(known: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (f64::from(known) * f64::from(numerator) / f64::from(denominator)).round();
    scaled.clamp(1.0, f64::from(u32::MAX)) as u32
}
