//! `/sync` request and response payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key the widget uses for not-yet-persisted record ids
pub const PHANTOM_ID_KEY: &str = "$PhantomId";

/// Batch of client-side changes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Echoed back untouched; the widget sends a number or a string
    #[serde(default)]
    pub request_id: Value,
    pub resources: Option<TableChanges>,
    pub events: Option<TableChanges>,
}

/// Changes for one entity group
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableChanges {
    pub added: Option<Vec<Map<String, Value>>>,
    pub removed: Option<Vec<Map<String, Value>>>,
    pub updated: Option<Vec<Map<String, Value>>>,
}

/// Temporary id to server id pairing for an inserted record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhantomMapping {
    #[serde(rename = "$PhantomId")]
    pub phantom_id: Value,
    pub id: i64,
}

/// `{rows: [...]}` wrapper used by `/load` and `/sync`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRows<T> {
    pub rows: Vec<T>,
}

impl<T> GroupRows<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }
}

/// Successful `/sync` response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub request_id: Value,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<GroupRows<PhantomMapping>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<GroupRows<PhantomMapping>>,
}
