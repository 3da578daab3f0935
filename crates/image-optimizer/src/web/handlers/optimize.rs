//! Image optimize handlers

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::web::{AppState, extractors::ValidatedTransform, responses::image_response};

/// `GET /optimize`
pub async fn optimize(
    State(state): State<AppState>,
    ValidatedTransform(request): ValidatedTransform,
) -> Response {
    match state.optimizer.optimize(&request).await {
        Ok(image) => image_response(image, &state.cache_control),
        Err(e) => {
            warn!(
                kind = e.kind(),
                client_error = e.is_client_error(),
                error = %e,
                "Optimize request failed"
            );
            e.into_response()
        }
    }
}

/// `GET /optimize/{filename}`; the filename only makes the URL look like a file
pub async fn optimize_named(
    Path(_filename): Path<String>,
    state: State<AppState>,
    request: ValidatedTransform,
) -> Response {
    optimize(state, request).await
}
