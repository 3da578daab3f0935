//! Error type definitions for the image optimizer
//!
//! `TransformError` covers everything that can end a single optimize request;
//! `AppError` covers wiring the service together at startup.

use sandboxed_cache_store::CacheStoreError;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Cache store setup errors
    #[error("Cache store error: {0}")]
    Store(#[from] CacheStoreError),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors that terminate a single transform request
///
/// Every variant is terminal: nothing is retried and nothing is partially served.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Source host is not on the allow-list
    #[error("URL domain not allowed: {url}")]
    Forbidden { url: String },

    /// Required parameter missing or malformed
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Source could not be retrieved (network failure, timeout, oversized body)
    #[error("Failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    /// Neither the source content type nor the requested output is one we handle
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    /// Source bytes do not parse as the detected format
    #[error("Failed to decode {format} image: {message}")]
    Decode { format: String, message: String },

    /// Resolution spec is malformed or degenerate
    #[error("Invalid resolution '{spec}': {reason}")]
    InvalidResolution { spec: String, reason: String },

    /// Codec rejected the transcode
    #[error("Failed to encode {format} image: {message}")]
    Encode { format: String, message: String },

    /// Cache store read or write failed
    #[error("Cache store error: {0}")]
    Store(#[from] CacheStoreError),
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl TransformError {
    pub fn forbidden<S: Into<String>>(url: S) -> Self {
        Self::Forbidden { url: url.into() }
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn fetch<U: Into<String>, M: ToString>(url: U, message: M) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode<F: Into<String>, M: ToString>(format: F, message: M) -> Self {
        Self::Decode {
            format: format.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid_resolution<S: Into<String>, R: Into<String>>(spec: S, reason: R) -> Self {
        Self::InvalidResolution {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    pub fn encode<F: Into<String>, M: ToString>(format: F, message: M) -> Self {
        Self::Encode {
            format: format.into(),
            message: message.to_string(),
        }
    }

    /// Stable name of the error kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Forbidden { .. } => "forbidden",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Fetch { .. } => "fetch_error",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Decode { .. } => "decode_error",
            Self::InvalidResolution { .. } => "invalid_resolution",
            Self::Encode { .. } => "encode_error",
            Self::Store(_) => "io_error",
        }
    }

    /// Whether the caller supplied bad input, as opposed to an upstream or local failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. } | Self::InvalidResolution { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(TransformError::invalid_request("url is required").is_client_error());
        assert!(TransformError::invalid_resolution("0x0", "zero").is_client_error());
        assert!(!TransformError::forbidden("http://evil.com/a.png").is_client_error());
        assert!(!TransformError::fetch("http://a/b", "timeout").is_client_error());
    }

    #[test]
    fn test_store_errors_are_io_kind() {
        let err: TransformError = CacheStoreError::NotFound {
            name: "abc.png".to_string(),
        }
        .into();
        assert_eq!(err.kind(), "io_error");
        assert!(err.to_string().contains("abc.png"));
    }
}
