//! JSON body and query extractors that reject with the API error shape.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AppError;

/// Like [`Json`], but a malformed body is a 400 `{"error": ...}`.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            AppError::bad_request("Invalid request body.", json!({ "reason": e.body_text() }))
        })?;
        Ok(Self(value))
    }
}

/// Like [`Query`], but a malformed query string is a 400 `{"error": ...}`.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                AppError::bad_request("Invalid query string.", json!({ "reason": e.body_text() }))
            })?;
        Ok(Self(value))
    }
}
