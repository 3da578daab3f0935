//! HTTP middleware

use axum::{
    extract::Request,
    http::{HeaderValue, Method, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Log every request with a generated request id and echo the id back
///
/// Query strings are left out of the log line since they carry the source URL.
pub async fn request_logging_middleware(
    method: Method,
    uri: Uri,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    let path = uri.path().to_string();

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        "HTTP request started"
    );

    let mut response = next.run(request).await;
    let status = response.status().as_u16();
    let duration = start.elapsed();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }

    if status >= 400 {
        warn!(
            method = %method,
            path = %path,
            status = status,
            request_id = %request_id,
            duration_ms = duration.as_millis() as u64,
            "HTTP request completed with error"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status,
            request_id = %request_id,
            duration_ms = duration.as_millis() as u64,
            "HTTP request completed"
        );
    }

    response
}
