//! Failure responses
//!
//! The widget protocol never uses HTTP status codes for errors: every failure
//! is a 200 with `{success: false, message}`. The underlying error is logged
//! and the client only sees the endpoint's static message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::db::DbError;

/// A failed request, reported as `{success: false, message}`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    message: &'static str,
    request_id: Option<Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a Value>,
    success: bool,
    message: &'a str,
}

impl ApiFailure {
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            request_id: None,
        }
    }

    /// Log `err` and hide it behind `message`.
    pub fn db(message: &'static str, err: DbError) -> Self {
        tracing::error!(error = %err, "{}", message);
        Self::new(message)
    }

    /// Echo the client's request id (`/sync` responses carry it).
    pub fn with_request_id(mut self, request_id: Value) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = FailureBody {
            request_id: self.request_id.as_ref(),
            success: false,
            message: self.message,
        };

        (StatusCode::OK, Json(body)).into_response()
    }
}
