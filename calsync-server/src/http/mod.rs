//! HTTP server layer
//!
//! Axum server with:
//! - CORS restricted to the configured frontend origin, credentials allowed
//! - Request tracing
//! - Graceful shutdown
//! - `{success: false}` failure envelopes, always HTTP 200

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiFailure;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError, Storage};

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Send one request and decode the JSON response body.
    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
