//! Path and query extractors whose rejections use the JSON error envelope.

use axum::{
    async_trait,
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequestParts, Path, Query,
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Typed path segments; a malformed segment becomes `AppError::Validation`.
pub struct PathParam<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection {
                PathRejection::FailedToDeserializePathParams(e) => {
                    AppError::validation(e.body_text())
                }
                // Route/extractor mismatch, not a client error
                other => AppError::internal(other.body_text()),
            })?;

        Ok(PathParam(value))
    }
}

/// Typed query string; an undecodable query becomes `AppError::Validation`.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| AppError::validation(rejection.body_text()))?;

        Ok(QueryParams(value))
    }
}
