//! Inbound transform request and the cache identifiers derived from it

use serde::Deserialize;
use std::fmt;

use super::format::OutputFormat;
use crate::errors::{TransformError, TransformResult};

/// Raw query parameters of `GET /optimize`
///
/// Every field is optional on the wire; validation happens in
/// [`TransformRequest::from_query`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptimizeQuery {
    pub url: Option<String>,
    pub output: Option<String>,
    pub quality: Option<String>,
    pub resolution: Option<String>,
    pub v: Option<String>,
}

/// A validated, immutable description of one transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub source_url: String,
    /// `None` means "same format as the source"
    pub output: Option<OutputFormat>,
    pub quality: i32,
    /// Raw resolution spec, empty for no resize
    pub resolution: String,
    /// Opaque cache-buster
    pub version: String,
}

impl TransformRequest {
    pub fn new<S: Into<String>>(source_url: S) -> Self {
        Self {
            source_url: source_url.into(),
            output: None,
            quality: 0,
            resolution: String::new(),
            version: String::new(),
        }
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_resolution<S: Into<String>>(mut self, resolution: S) -> Self {
        self.resolution = resolution.into();
        self
    }

    pub fn with_version<S: Into<String>>(mut self, version: S) -> Self {
        self.version = version.into();
        self
    }

    /// Validate raw query parameters
    ///
    /// A missing or blank `url` is an invalid request and an `output` token
    /// outside `jpeg`/`png`/`webp` is an unsupported format. A `quality` that is
    /// absent or does not parse as an integer becomes 0.
    pub fn from_query(query: OptimizeQuery) -> TransformResult<Self> {
        let source_url = query
            .url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| TransformError::invalid_request("url parameter is required"))?;

        let output = match query.output.as_deref() {
            None | Some("") => None,
            Some(token) => Some(
                OutputFormat::from_token(token)
                    .ok_or_else(|| TransformError::unsupported_format(token))?,
            ),
        };

        let quality = query
            .quality
            .as_deref()
            .and_then(|q| q.trim().parse::<i32>().ok())
            .unwrap_or(0);

        Ok(Self {
            source_url,
            output,
            quality,
            resolution: query.resolution.unwrap_or_default(),
            version: query.v.unwrap_or_default(),
        })
    }

    /// Token hashed into the cache key for the requested output, empty when unset
    pub fn output_token(&self) -> &str {
        self.output.as_ref().map(|f| f.as_ref()).unwrap_or("")
    }
}

/// Lowercase hex digest identifying one combination of transform parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub(crate) fn from_digest(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the entry holding this key encoded as `format`
    pub fn entry_name(&self, format: OutputFormat) -> CacheEntryName {
        CacheEntryName {
            key: self.clone(),
            format,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `{key}.{format}`, the whole on-disk contract for an entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheEntryName {
    key: CacheKey,
    format: OutputFormat,
}

impl CacheEntryName {
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl fmt::Display for CacheEntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.key, self.format.extension())
    }
}
