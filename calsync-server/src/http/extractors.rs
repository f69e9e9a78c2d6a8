//! Custom Axum extractors
//!
//! Both reject with an [`ApiFailure`] so malformed input still gets the
//! `{success: false}` envelope instead of an axum rejection status. Handlers
//! take them as `Result<_, ApiFailure>` and answer with their own message.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde_json::Value;

use super::error::ApiFailure;

const MALFORMED_BODY: &str = "There was an error reading the request body";
const INVALID_RECORD_ID: &str = "There was an error reading the record id";

/// JSON request body of any shape
pub struct JsonPayload(pub Value);

impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::warn!(reason = %rejection.body_text(), "rejected request body");
                ApiFailure::new(MALFORMED_BODY)
            })?;

        Ok(Self(value))
    }
}

/// Integer `{id}` path segment
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiFailure::new(INVALID_RECORD_ID))?;

        raw.trim().parse::<i64>().map(Self).map_err(|_| {
            tracing::warn!(id = %raw, "rejected record id");
            ApiFailure::new(INVALID_RECORD_ID)
        })
    }
}
