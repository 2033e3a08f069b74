// Extractors that run the validation gate before a handler body executes.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, StatusCode},
    Json,
};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::validation::{self, Schema, Source};

/// JSON body validated against `T::FIELDS`
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Schema,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state)
            .await
            .map_err(body_rejection)?;

        validation::parse::<T>(&payload, Source::Body)
            .map(ValidJson)
            .map_err(ApiError::Validation)
    }
}

// Oversized bodies keep their 413; every other unreadable body is a 400 at path ""
fn body_rejection(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge(rejection.body_text());
    }
    ApiError::validation("", rejection.body_text())
}

/// Query string validated against `T::FIELDS`
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: Schema,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation("", rejection.body_text()))?;

        let payload: Map<String, Value> = params
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        validation::parse::<T>(&Value::Object(payload), Source::Query)
            .map(ValidQuery)
            .map_err(ApiError::Validation)
    }
}

/// Positive integer `:id` path segment
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation("id", rejection.body_text()))?;

        parse_id(&raw).map(ResourceId)
    }
}

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::validation("id", "id must be a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("17").ok(), Some(17));
        for bad in ["0", "-3", "abc", "1.5", "99999999999", ""] {
            assert!(parse_id(bad).is_err(), "{bad}");
        }
    }
}
