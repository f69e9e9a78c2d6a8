//! Typed rows built from client JSON
//!
//! A [`Record`] pairs allow-listed columns with values already coerced to the
//! column's storage type. Coercion mirrors what MySQL accepts in strict mode:
//! numeric strings are fine for integer columns, `"abc"` is not.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Number, Value};

use super::repos::DbError;
use super::schema::{Column, ColumnKind, Table};

/// A value ready to be bound to a statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Integer(i64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

/// What to do with a timestamp that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateFallback {
    /// Store NULL (legacy endpoints coerce through date parsing first)
    Null,
    /// Fail the statement
    Reject,
}

/// Column/value pairs for one INSERT or UPDATE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    values: Vec<(&'static Column, SqlValue)>,
}

impl Record {
    /// Build a row covering every column of `table`, in allow-list order.
    ///
    /// Missing keys become NULL and keys outside the allow-list are ignored,
    /// which gives the legacy endpoints their full-row replace semantics.
    pub fn full_row(table: Table, payload: &Value) -> Result<Self, DbError> {
        let fields = payload
            .as_object()
            .ok_or(DbError::NotAnObject { table: table.name() })?;

        let values = table
            .columns()
            .iter()
            .map(|column| {
                let value = fields.get(column.name).unwrap_or(&Value::Null);
                Ok((column, coerce(column, value, DateFallback::Null)?))
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(Self { values })
    }

    /// Build a row from exactly the keys the client sent.
    ///
    /// Unknown keys are rejected rather than dropped.
    pub fn partial(table: Table, fields: &Map<String, Value>) -> Result<Self, DbError> {
        let values = fields
            .iter()
            .map(|(key, value)| {
                let column = table.column(key).ok_or_else(|| DbError::UnknownColumn {
                    table: table.name(),
                    column: key.clone(),
                })?;
                Ok((column, coerce(column, value, DateFallback::Reject)?))
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(Self { values })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static Column, &SqlValue)> + '_ {
        self.values.iter().map(|(column, value)| (*column, value))
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.iter().find(|(c, _)| c.name == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn coerce(column: &Column, value: &Value, dates: DateFallback) -> Result<SqlValue, DbError> {
    if value.is_null() {
        return Ok(SqlValue::Null);
    }

    let invalid = |reason: &str| DbError::InvalidValue {
        column: column.name.to_owned(),
        reason: reason.to_owned(),
    };

    match column.kind {
        ColumnKind::Text => match value {
            Value::String(s) => Ok(SqlValue::Text(s.clone())),
            Value::Number(n) => Ok(SqlValue::Text(n.to_string())),
            Value::Bool(b) => Ok(SqlValue::Text(if *b { "1" } else { "0" }.to_owned())),
            _ => Err(invalid("expected a string")),
        },
        ColumnKind::Integer => match value {
            Value::Number(n) => whole_number(n)
                .map(SqlValue::Integer)
                .ok_or_else(|| invalid("expected an integer")),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(SqlValue::Integer)
                .map_err(|_| invalid("expected an integer")),
            Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
            _ => Err(invalid("expected an integer")),
        },
        ColumnKind::Bool => match value {
            Value::Bool(b) => Ok(SqlValue::Bool(*b)),
            Value::Number(n) => Ok(SqlValue::Bool(n.as_f64().is_some_and(|f| f != 0.0))),
            Value::String(s) => match s.trim() {
                "true" | "1" => Ok(SqlValue::Bool(true)),
                "false" | "0" => Ok(SqlValue::Bool(false)),
                _ => Err(invalid("expected a boolean")),
            },
            _ => Err(invalid("expected a boolean")),
        },
        ColumnKind::Timestamp => match parse_timestamp(value) {
            Some(ts) => Ok(SqlValue::Timestamp(ts)),
            None if dates == DateFallback::Null => Ok(SqlValue::Null),
            None => Err(invalid("expected a date")),
        },
        ColumnKind::Json => serde_json::to_string(value)
            .map(SqlValue::Text)
            .map_err(|e| invalid(&e.to_string())),
    }
}

/// Integral JSON numbers that fit a BIGINT. `12.0` is accepted, `1e20` and
/// `12.5` are not.
fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && fits_i64(*f))
            .map(|f| f as i64)
    })
}

// i64::MAX is not representable as f64; the cast rounds it up to 2^63
fn fits_i64(f: f64) -> bool {
    f >= i64::MIN as f64 && f < i64::MAX as f64
}

/// Parse the date shapes calendar widgets send.
///
/// Accepts RFC 3339, naive ISO date-times (taken as UTC), plain dates and
/// epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| fits_i64(*f)).map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
