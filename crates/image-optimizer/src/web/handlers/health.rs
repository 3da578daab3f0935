//! Health check HTTP handlers

use axum::{extract::State, response::IntoResponse};
use tracing::warn;

use crate::web::{AppState, responses::HealthResponse};

/// Plain liveness text
pub async fn index() -> &'static str {
    "ok!"
}

/// Health check endpoint
///
/// Unhealthy when the output directory has gone away underneath the store.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let output_directory = state.optimizer.store().base_directory();
    let output_display = output_directory.display().to_string();

    match tokio::fs::metadata(output_directory).await {
        Ok(metadata) if metadata.is_dir() => HealthResponse::healthy(output_display),
        Ok(_) => {
            warn!(output_directory = %output_display, "Output directory is not a directory");
            HealthResponse::unhealthy(output_display)
        }
        Err(e) => {
            warn!(output_directory = %output_display, error = %e, "Output directory is unavailable");
            HealthResponse::unhealthy(output_display)
        }
    }
}
