//! Legacy endpoints over `events` / `resources`
//!
//! Event writes use the fixed 16-column mapping: every column is written on
//! insert and update, so an update replaces the whole row.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::db::{Record, Table};
use crate::http::error::ApiFailure;
use crate::http::extractors::{JsonPayload, RecordId};
use crate::http::server::AppState;
use crate::models::{EventRow, ResourceRow};

const GET_DATA_FAILED: &str = "There was an error getting the events";
const ADD_EVENT_FAILED: &str = "There was an error adding the event";
const DELETE_EVENT_FAILED: &str = "There was an error deleting the event";
const UPDATE_EVENT_FAILED: &str = "There was an error updating the event";

/// GET /data response
#[derive(Serialize)]
pub struct DataResponse {
    pub success: bool,
    pub events: Vec<EventRow>,
    pub resources: Vec<ResourceRow>,
}

/// POST /data/event-add response
#[derive(Serialize)]
pub struct AddEventResponse {
    pub success: bool,
    pub id: i64,
}

/// Bare `{success: true}`
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// GET /data - all resources and events, fetched concurrently
async fn get_data(State(state): State<AppState>) -> Result<Json<DataResponse>, ApiFailure> {
    let (resources, events) =
        tokio::try_join!(state.legacy.list_resources(), state.legacy.list_events())
            .map_err(|e| ApiFailure::db(GET_DATA_FAILED, e))?;

    Ok(Json(DataResponse {
        success: true,
        events,
        resources,
    }))
}

/// POST /data/event-add - insert one event
async fn add_event(
    State(state): State<AppState>,
    payload: Result<JsonPayload, ApiFailure>,
) -> Result<Json<AddEventResponse>, ApiFailure> {
    let JsonPayload(event) = payload.map_err(|_| ApiFailure::new(ADD_EVENT_FAILED))?;
    let record =
        Record::full_row(Table::Events, &event).map_err(|e| ApiFailure::db(ADD_EVENT_FAILED, e))?;
    let id = state
        .legacy
        .add_event(&record)
        .await
        .map_err(|e| ApiFailure::db(ADD_EVENT_FAILED, e))?;

    Ok(Json(AddEventResponse { success: true, id }))
}

/// POST /data/event-delete/{id} - succeeds even when nothing matched
async fn delete_event(
    State(state): State<AppState>,
    id: Result<RecordId, ApiFailure>,
) -> Result<Json<SuccessResponse>, ApiFailure> {
    let RecordId(id) = id.map_err(|_| ApiFailure::new(DELETE_EVENT_FAILED))?;
    state
        .legacy
        .delete_event(id)
        .await
        .map_err(|e| ApiFailure::db(DELETE_EVENT_FAILED, e))?;

    Ok(SuccessResponse::ok())
}

/// POST /data/event-update/{id} - full-row replace
async fn update_event(
    State(state): State<AppState>,
    id: Result<RecordId, ApiFailure>,
    payload: Result<JsonPayload, ApiFailure>,
) -> Result<Json<SuccessResponse>, ApiFailure> {
    let RecordId(id) = id.map_err(|_| ApiFailure::new(UPDATE_EVENT_FAILED))?;
    let JsonPayload(event) = payload.map_err(|_| ApiFailure::new(UPDATE_EVENT_FAILED))?;
    let record = Record::full_row(Table::Events, &event)
        .map_err(|e| ApiFailure::db(UPDATE_EVENT_FAILED, e))?;
    state
        .legacy
        .update_event(id, &record)
        .await
        .map_err(|e| ApiFailure::db(UPDATE_EVENT_FAILED, e))?;

    Ok(SuccessResponse::ok())
}

/// Legacy routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/data", get(get_data))
        .route("/data/event-add", post(add_event))
        .route("/data/event-delete/{id}", post(delete_event))
        .route("/data/event-update/{id}", post(update_event))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::db::{MemoryRepository, Record, Table};
    use crate::http::server::{build_router, AppState, ServerConfig};
    use crate::http::test_support::send;

    fn app(repo: &MemoryRepository) -> axum::Router {
        build_router(AppState::in_memory(repo.clone()), &ServerConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn empty_tables_return_empty_arrays() {
        let app = app(&MemoryRepository::new());
        let (status, body) = send(&app, "GET", "/data", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "events": [], "resources": []}));
    }

    #[tokio::test]
    async fn added_event_shows_up_in_data() {
        let repo = MemoryRepository::new();
        let app = app(&repo);

        let (_, added) = send(
            &app,
            "POST",
            "/data/event-add",
            Some(json!({
                "title": "Planning",
                "color": "#ff0000",
                "start": "2024-02-01T09:00:00Z",
                "end": "2024-02-01T10:30:00Z",
                "allDay": false,
                "resource": 2,
                "timezone": "Europe/Berlin",
                "editable": true
            })),
        )
        .await;
        assert_eq!(added, json!({"success": true, "id": 1}));

        let (_, data) = send(&app, "GET", "/data", None).await;
        let event = &data["events"][0];
        assert_eq!(event["id"], 1);
        assert_eq!(event["title"], "Planning");
        assert_eq!(event["start"], "2024-02-01T09:00:00Z");
        assert_eq!(event["resource"], 2);
        assert_eq!(event["editable"], true);
        assert!(event["tooltip"].is_null());
    }

    #[tokio::test]
    async fn data_includes_resources() {
        let repo = MemoryRepository::new();
        let room = Record::full_row(Table::Resources, &json!({"name": "Room 1", "color": "#00f"})).unwrap();
        repo.seed_resource(&room).await;

        let (_, data) = send(&app(&repo), "GET", "/data", None).await;
        assert_eq!(data["resources"], json!([{
            "id": 1,
            "name": "Room 1",
            "color": "#00f",
            "cssClass": null,
            "eventCreation": null,
            "eventDragBetweenResources": null,
            "eventDragInTime": null,
            "eventResize": null
        }]));
    }

    #[tokio::test]
    async fn delete_unknown_id_still_succeeds() {
        let app = app(&MemoryRepository::new());
        let (status, body) = send(&app, "POST", "/data/event-delete/4242", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
    }

    #[tokio::test]
    async fn delete_removes_event() {
        let app = app(&MemoryRepository::new());
        send(&app, "POST", "/data/event-add", Some(json!({"title": "x"}))).await;

        let (_, body) = send(&app, "POST", "/data/event-delete/1", None).await;
        assert_eq!(body, json!({"success": true}));

        let (_, data) = send(&app, "GET", "/data", None).await;
        assert_eq!(data["events"], json!([]));
    }

    #[tokio::test]
    async fn update_replaces_the_whole_row() {
        let app = app(&MemoryRepository::new());
        send(
            &app,
            "POST",
            "/data/event-add",
            Some(json!({"title": "Draft", "tooltip": "first"})),
        )
        .await;

        let (_, body) = send(
            &app,
            "POST",
            "/data/event-update/1",
            Some(json!({"title": "Final", "recurring": true})),
        )
        .await;
        assert_eq!(body, json!({"success": true}));

        let (_, data) = send(&app, "GET", "/data", None).await;
        let event = &data["events"][0];
        assert_eq!(event["title"], "Final");
        assert_eq!(event["recurring"], true);
        assert!(event["tooltip"].is_null());
    }

    #[tokio::test]
    async fn type_mismatch_reports_failure_with_200() {
        let app = app(&MemoryRepository::new());
        let (status, body) = send(
            &app,
            "POST",
            "/data/event-add",
            Some(json!({"title": "x", "allDay": "sometimes"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": false, "message": "There was an error adding the event"})
        );
    }

    #[tokio::test]
    async fn update_of_non_object_reports_update_failure() {
        let app = app(&MemoryRepository::new());
        let (_, body) = send(&app, "POST", "/data/event-update/1", Some(json!("nope"))).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "There was an error updating the event");
    }

    #[tokio::test]
    async fn non_numeric_id_reports_the_endpoint_failure() {
        let app = app(&MemoryRepository::new());
        let (status, body) = send(&app, "POST", "/data/event-delete/abc", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": false, "message": "There was an error deleting the event"})
        );

        let (_, body) = send(&app, "POST", "/data/event-update/abc", Some(json!({"title": "x"}))).await;
        assert_eq!(
            body,
            json!({"success": false, "message": "There was an error updating the event"})
        );
    }

    #[tokio::test]
    async fn missing_json_body_reports_the_endpoint_failure() {
        let app = app(&MemoryRepository::new());
        let (status, body) = send(&app, "POST", "/data/event-add", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": false, "message": "There was an error adding the event"})
        );

        let (_, body) = send(&app, "POST", "/data/event-update/1", None).await;
        assert_eq!(body["message"], "There was an error updating the event");
    }
}
