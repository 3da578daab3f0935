//! Image formats understood on the way in and on the way out

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// One of the three formats the service decodes and encodes
///
/// The lowercase name doubles as the query-string token, the cache file
/// extension and the MIME subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    /// File extension used in cache entry names
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// Classify a response `Content-Type` header
    ///
    /// Case-sensitive substring match against `jpeg`, then `png`, then `webp`;
    /// the first hit wins.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        Self::iter().find(|format| content_type.contains(format.as_ref()))
    }

    /// Parse the `output` query token; `None` when the token is not one of ours
    pub fn from_token(token: &str) -> Option<Self> {
        token.parse().ok()
    }

    pub(crate) fn codec(&self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}
