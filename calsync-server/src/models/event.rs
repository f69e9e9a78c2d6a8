//! Event rows

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use sqlx::FromRow;

use crate::db::Record;

/// A scheduled occurrence, optionally recurring, tied to a resource.
///
/// Both table families decode into this shape. `exception_dates` only exists
/// in the scheduler table and stays `None` for legacy rows; any other missing
/// column decodes as `None` too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct EventRow {
    pub id: i64,
    #[sqlx(default)]
    pub title: Option<String>,
    #[sqlx(default)]
    pub tooltip: Option<String>,
    #[sqlx(default)]
    pub color: Option<String>,
    #[sqlx(default)]
    pub start: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub end: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub all_day: Option<bool>,
    #[sqlx(default)]
    pub recurring: Option<bool>,
    #[sqlx(default)]
    pub recurring_exception: Option<String>,
    #[sqlx(default)]
    pub recurring_exception_rule: Option<String>,
    #[sqlx(default)]
    pub resource: Option<i64>,
    #[sqlx(default)]
    pub timezone: Option<String>,
    #[sqlx(default)]
    pub drag_between_resources: Option<bool>,
    #[sqlx(default)]
    pub drag_in_time: Option<bool>,
    #[sqlx(default)]
    pub resize: Option<bool>,
    #[sqlx(default)]
    pub editable: Option<bool>,
    #[sqlx(default)]
    pub css_class: Option<String>,
    /// JSON text as stored; emitted as parsed JSON
    #[sqlx(default)]
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_json_text"
    )]
    pub exception_dates: Option<String>,
}

impl EventRow {
    /// Overwrite the columns present in `record`.
    pub fn apply(&mut self, record: &Record) {
        for (column, value) in record.iter() {
            match column.name {
                "title" => self.title = value.as_text(),
                "tooltip" => self.tooltip = value.as_text(),
                "color" => self.color = value.as_text(),
                "start" => self.start = value.as_timestamp(),
                "end" => self.end = value.as_timestamp(),
                "allDay" => self.all_day = value.as_bool(),
                "recurring" => self.recurring = value.as_bool(),
                "recurringException" => self.recurring_exception = value.as_text(),
                "recurringExceptionRule" => self.recurring_exception_rule = value.as_text(),
                "resource" => self.resource = value.as_integer(),
                "timezone" => self.timezone = value.as_text(),
                "dragBetweenResources" => self.drag_between_resources = value.as_bool(),
                "dragInTime" => self.drag_in_time = value.as_bool(),
                "resize" => self.resize = value.as_bool(),
                "editable" => self.editable = value.as_bool(),
                "cssClass" => self.css_class = value.as_text(),
                "exceptionDates" => self.exception_dates = value.as_text(),
                _ => {}
            }
        }
    }
}

/// Emit stored JSON text as a JSON value, falling back to the raw string.
fn serialize_json_text<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.as_deref() {
        Some(text) => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(parsed) => parsed.serialize(serializer),
            Err(_) => serializer.serialize_str(text),
        },
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Table;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn exception_dates_serialize_as_json() {
        let row = EventRow {
            id: 1,
            exception_dates: Some(r#"{"2024-01-02":true}"#.into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["exceptionDates"], json!({"2024-01-02": true}));
    }

    #[test]
    fn legacy_rows_omit_exception_dates() {
        let value = serde_json::to_value(EventRow::default()).unwrap();
        assert!(value.get("exceptionDates").is_none());
        assert!(value.get("allDay").is_some());
        assert!(value.get("dragBetweenResources").is_some());
    }

    #[test]
    fn non_json_exception_dates_pass_through() {
        let row = EventRow {
            exception_dates: Some("2024-01-02".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["exceptionDates"], "2024-01-02");
    }

    #[test]
    fn apply_full_row_replaces_everything() {
        let mut row = EventRow {
            id: 7,
            title: Some("Old".into()),
            tooltip: Some("keep?".into()),
            ..Default::default()
        };
        let payload = json!({"title": "New", "start": "2024-03-01T09:00:00Z", "allDay": false});
        row.apply(&Record::full_row(Table::Events, &payload).unwrap());

        assert_eq!(row.id, 7);
        assert_eq!(row.title.as_deref(), Some("New"));
        assert_eq!(row.tooltip, None);
        assert_eq!(row.start, Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()));
        assert_eq!(row.all_day, Some(false));
    }
}
