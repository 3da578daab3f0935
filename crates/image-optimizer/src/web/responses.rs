//! HTTP response types and error mapping
//!
//! Failures are a single plain-text line with a status; successes are the raw
//! encoded image bytes.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::errors::TransformError;
use crate::models::OptimizedImage;

pub const X_CACHE: &str = "x-cache";

/// Status code for a transform failure
pub fn status_for(error: &TransformError) -> StatusCode {
    match error {
        TransformError::Forbidden { .. } => StatusCode::FORBIDDEN,
        TransformError::InvalidRequest { .. } | TransformError::InvalidResolution { .. } => {
            StatusCode::BAD_REQUEST
        }
        TransformError::Fetch { .. }
        | TransformError::UnsupportedFormat { .. }
        | TransformError::Decode { .. }
        | TransformError::Encode { .. }
        | TransformError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// One human-readable line describing the failure
pub fn error_message(error: &TransformError) -> String {
    match error {
        TransformError::Forbidden { .. } => "URL domain not allowed".to_string(),
        TransformError::InvalidRequest { message } => message.clone(),
        TransformError::Fetch { .. }
        | TransformError::UnsupportedFormat { .. }
        | TransformError::Decode { .. } => format!("Error downloading image: {error}"),
        TransformError::InvalidResolution { .. } | TransformError::Encode { .. } => {
            format!("Error compressing image: {error}")
        }
        TransformError::Store(_) => format!("Error opening compressed image file: {error}"),
    }
}

impl IntoResponse for TransformError {
    fn into_response(self) -> Response {
        (status_for(&self), error_message(&self)).into_response()
    }
}

/// Successful image response carrying content type, caching and hit/miss headers
pub fn image_response(image: OptimizedImage, cache_control: &HeaderValue) -> Response {
    let mut response = image.data.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(image.format.mime_type()),
    );
    headers.insert(header::CACHE_CONTROL, cache_control.clone());
    headers.insert(X_CACHE, HeaderValue::from_static(image.cache_status.as_static_str()));
    response
}

/// Health check response body
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub output_directory: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthResponse {
    pub fn healthy(output_directory: String) -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            output_directory,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn unhealthy(output_directory: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            ..Self::healthy(output_directory)
        }
    }
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        let status = if self.status == "healthy" {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (status, Json(self)).into_response()
    }
}
