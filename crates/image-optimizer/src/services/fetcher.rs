//! Source image retrieval and decoding

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::config::FetchConfig;
use crate::errors::{AppResult, TransformError, TransformResult};
use crate::models::{DecodedImage, OutputFormat};
use crate::utils::url::UrlUtils;

/// Anything that can turn a URL into a decoded image
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Retrieve and decode the image at `url`
    ///
    /// The detected format comes from the response `Content-Type`; responses
    /// are not filtered on status, so an error page fails as a format or
    /// decode error.
    async fn fetch(&self, url: &str) -> TransformResult<DecodedImage>;
}

/// `reqwest`-backed source with a total timeout and a body size cap
#[derive(Clone)]
pub struct HttpImageSource {
    client: Client,
    max_body_size: u64,
}

impl HttpImageSource {
    pub fn new(config: &FetchConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            max_body_size: config.max_body_size,
        })
    }

    async fn read_body(&self, url: &str, mut response: reqwest::Response) -> TransformResult<Bytes> {
        if let Some(declared) = response.content_length()
            && declared > self.max_body_size
        {
            return Err(TransformError::fetch(
                url,
                format!("response body of {declared} bytes exceeds the maximum of {} bytes", self.max_body_size),
            ));
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| TransformError::fetch(url, e))?
        {
            if (body.len() + chunk.len()) as u64 > self.max_body_size {
                return Err(TransformError::fetch(
                    url,
                    format!("response body exceeds the maximum of {} bytes", self.max_body_size),
                ));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body.freeze())
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> TransformResult<DecodedImage> {
        let log_url = UrlUtils::obfuscate_credentials(url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransformError::fetch(log_url.as_str(), e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let format = OutputFormat::from_content_type(&content_type).ok_or_else(|| {
            TransformError::unsupported_format(if content_type.is_empty() {
                "(no content type)"
            } else {
                content_type.as_str()
            })
        })?;

        let body = self.read_body(&log_url, response).await?;

        debug!(
            url = %log_url,
            status = %status,
            content_type = %content_type,
            bytes = body.len(),
            "Fetched source image"
        );

        decode(body, format).await
    }
}

/// Decode `bytes` as `format` on the blocking pool
pub async fn decode(bytes: Bytes, format: OutputFormat) -> TransformResult<DecodedImage> {
    tokio::task::spawn_blocking(move || {
        image::load_from_memory_with_format(&bytes, format.codec())
            .map(|image| DecodedImage {
                image,
                detected_format: format,
            })
            .map_err(|e| TransformError::decode(format.as_ref(), e))
    })
    .await
    .map_err(|e| TransformError::decode(format.as_ref(), e))?
}
