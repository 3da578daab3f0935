//! Request extractors and validation

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::errors::TransformError;
use crate::models::{OptimizeQuery, TransformRequest};

/// A query string already validated into a [`TransformRequest`]
///
/// Rejects with the same plain-text error responses the pipeline uses, so a
/// missing `url` or unknown `output` fails before any handler code runs.
#[derive(Debug, Clone)]
pub struct ValidatedTransform(pub TransformRequest);

impl<S> FromRequestParts<S> for ValidatedTransform
where
    S: Send + Sync,
{
    type Rejection = TransformError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<OptimizeQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| TransformError::invalid_request(rejection.body_text()))?;

        TransformRequest::from_query(query).map(Self)
    }
}
