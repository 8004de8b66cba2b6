//! Positional mapping of result rows onto column names
//!
//! Each fixed query declares its output columns in select order. The
//! value at position `i` is decoded according to its PostgreSQL type and
//! stored under the `i`-th name.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

use super::DbError;

/// JSON object built from one row.
pub type RowObject = Map<String, Value>;

/// Column types the readings queries produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Text,
    Timestamptz,
    Timestamp,
    Date,
    Json,
}

impl ColumnKind {
    /// Map a PostgreSQL type name (as sqlx reports it) to a column kind.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let kind = match name {
            "BOOL" => Self::Bool,
            "INT2" => Self::Int2,
            "INT4" => Self::Int4,
            "INT8" => Self::Int8,
            "FLOAT4" => Self::Float4,
            "FLOAT8" => Self::Float8,
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => Self::Text,
            "TIMESTAMPTZ" => Self::Timestamptz,
            "TIMESTAMP" => Self::Timestamp,
            "DATE" => Self::Date,
            "JSON" | "JSONB" => Self::Json,
            _ => return None,
        };
        Some(kind)
    }
}

/// Map a row positionally onto `columns`.
pub fn map_row(row: &PgRow, columns: &[&str]) -> Result<RowObject, DbError> {
    if row.len() != columns.len() {
        return Err(DbError::ColumnCount {
            expected: columns.len(),
            actual: row.len(),
        });
    }

    let mut object = Map::with_capacity(columns.len());
    for (idx, (name, column)) in columns.iter().zip(row.columns()).enumerate() {
        let type_name = column.type_info().name();
        let kind = ColumnKind::from_type_name(type_name).ok_or_else(|| DbError::UnsupportedColumn {
            column: (*name).to_string(),
            type_name: type_name.to_string(),
        })?;
        object.insert((*name).to_string(), decode(row, idx, kind)?);
    }

    Ok(object)
}

/// Map every row of a result set.
pub fn map_rows(rows: &[PgRow], columns: &[&str]) -> Result<Vec<RowObject>, DbError> {
    rows.iter().map(|row| map_row(row, columns)).collect()
}

fn decode(row: &PgRow, idx: usize, kind: ColumnKind) -> Result<Value, DbError> {
    let value = match kind {
        ColumnKind::Bool => row.try_get::<Option<bool>, _>(idx)?.map(Value::from),
        ColumnKind::Int2 => row.try_get::<Option<i16>, _>(idx)?.map(Value::from),
        ColumnKind::Int4 => row.try_get::<Option<i32>, _>(idx)?.map(Value::from),
        ColumnKind::Int8 => row.try_get::<Option<i64>, _>(idx)?.map(Value::from),
        ColumnKind::Float4 => row
            .try_get::<Option<f32>, _>(idx)?
            .map(|v| Value::from(f64::from(v))),
        // Non-finite floats become null.
        ColumnKind::Float8 => row.try_get::<Option<f64>, _>(idx)?.map(Value::from),
        ColumnKind::Text => row.try_get::<Option<String>, _>(idx)?.map(Value::from),
        ColumnKind::Timestamptz => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(|ts| Value::from(format_instant(ts))),
        ColumnKind::Timestamp => row
            .try_get::<Option<NaiveDateTime>, _>(idx)?
            .map(|ts| Value::from(ts.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())),
        ColumnKind::Date => row
            .try_get::<Option<NaiveDate>, _>(idx)?
            .map(|d| Value::from(d.to_string())),
        ColumnKind::Json => row.try_get::<Option<Value>, _>(idx)?,
    };

    Ok(value.unwrap_or(Value::Null))
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn format_instant(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
