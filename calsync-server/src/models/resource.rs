//! Resource rows

use serde::Serialize;
use sqlx::FromRow;

use crate::db::Record;

/// A resource (room, person, asset) events are scheduled against.
///
/// Columns the table does not have decode as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct ResourceRow {
    pub id: i64,
    #[sqlx(default)]
    pub name: Option<String>,
    #[sqlx(default)]
    pub color: Option<String>,
    #[sqlx(default)]
    pub css_class: Option<String>,
    #[sqlx(default)]
    pub event_creation: Option<bool>,
    #[sqlx(default)]
    pub event_drag_between_resources: Option<bool>,
    #[sqlx(default)]
    pub event_drag_in_time: Option<bool>,
    #[sqlx(default)]
    pub event_resize: Option<bool>,
}

impl ResourceRow {
    /// Overwrite the columns present in `record`.
    pub fn apply(&mut self, record: &Record) {
        for (column, value) in record.iter() {
            match column.name {
                "name" => self.name = value.as_text(),
                "color" => self.color = value.as_text(),
                "cssClass" => self.css_class = value.as_text(),
                "eventCreation" => self.event_creation = value.as_bool(),
                "eventDragBetweenResources" => self.event_drag_between_resources = value.as_bool(),
                "eventDragInTime" => self.event_drag_in_time = value.as_bool(),
                "eventResize" => self.event_resize = value.as_bool(),
                _ => {}
            }
        }
    }
}
