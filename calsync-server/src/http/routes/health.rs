//! Liveness endpoint
//!
//! Does not touch the database; a failing pool shows up on `/data` and
//! `/load` instead.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::{AppState, Storage};

/// GET /health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: Storage,
    pub version: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        storage: state.storage,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
