//! Custom Axum extractors

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// `Query<T>` whose rejection is a JSON validation error.
///
/// Repeated parameters (`?station=a&codi=b`, two `limit`s) fail to
/// deserialize; plain `Query` would answer with a text/plain 400.
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "rejected query string");
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "query",
                    reason: "malformed or repeated parameter",
                })
            })?;

        Ok(Self(value))
    }
}
