//! Scheduler endpoints over `bryntum_scheduler_events` / `bryntum_scheduler_resources`
//!
//! `/load` and `/sync` use the nested `{rows}` shape, which is not
//! interchangeable with the flat `/data` response.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::http::error::ApiFailure;
use crate::http::extractors::JsonPayload;
use crate::http::server::AppState;
use crate::models::{EventRow, GroupRows, ResourceRow, SyncRequest, SyncResponse};
use crate::sync::apply_sync;

const LOAD_FAILED: &str = "There was an error loading the resources and events data";
const SYNC_FAILED: &str = "There was an error syncing the data changes";

/// GET /load response
#[derive(Serialize)]
pub struct LoadResponse {
    pub success: bool,
    pub resources: GroupRows<ResourceRow>,
    pub events: GroupRows<EventRow>,
}

/// GET /load - all scheduler resources and events, fetched concurrently
async fn load(State(state): State<AppState>) -> Result<Json<LoadResponse>, ApiFailure> {
    let (resources, events) =
        tokio::try_join!(state.scheduler.load_resources(), state.scheduler.load_events())
            .map_err(|e| ApiFailure::db(LOAD_FAILED, e))?;

    Ok(Json(LoadResponse {
        success: true,
        resources: GroupRows::new(resources),
        events: GroupRows::new(events),
    }))
}

/// POST /sync - apply a batch of added/removed/updated records
///
/// Any failure fails the whole call. Changes applied before the failure stay
/// committed.
async fn sync(
    State(state): State<AppState>,
    payload: Result<JsonPayload, ApiFailure>,
) -> Result<Json<SyncResponse>, ApiFailure> {
    let JsonPayload(body) =
        payload.map_err(|_| ApiFailure::new(SYNC_FAILED).with_request_id(Value::Null))?;
    let request_id = body.get("requestId").cloned().unwrap_or(Value::Null);

    let request: SyncRequest = serde_json::from_value(body).map_err(|e| {
        tracing::error!(error = %e, "malformed sync request");
        ApiFailure::new(SYNC_FAILED).with_request_id(request_id.clone())
    })?;

    let response = apply_sync(state.scheduler.as_ref(), request)
        .await
        .map_err(|e| ApiFailure::db(SYNC_FAILED, e).with_request_id(request_id.clone()))?;

    Ok(Json(response))
}

/// Scheduler routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/load", get(load))
        .route("/sync", post(sync))
}
