//! Execution of arbitrary statements into dynamically typed tables.
//!
//! Used for catalogue reports and operator-supplied statements, whose
//! column sets are not known at compile time.

use futures::TryStreamExt;
use serde_json::{Number, Value};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Executor, Row, Statement, TypeInfo, ValueRef};
use tracing::debug;

use crate::models::Table;

/// Run `sql` on one connection and collect the result as a [`Table`].
///
/// At most `max_rows` rows are kept; when more were available the table is
/// flagged as truncated. Column names of an empty result are taken from the
/// prepared statement.
///
/// Errors are returned as raw `sqlx::Error` so callers can tell statement
/// failures apart from connection failures.
pub async fn fetch_table(
    conn: &mut SqliteConnection,
    sql: &str,
    max_rows: Option<usize>,
) -> std::result::Result<Table, sqlx::Error> {
    let limit = max_rows.unwrap_or(usize::MAX);
    let mut rows: Vec<SqliteRow> = Vec::new();
    let mut truncated = false;

    {
        let mut stream = sqlx::query(sql).fetch(&mut *conn);
        while let Some(row) = stream.try_next().await? {
            if rows.len() == limit {
                truncated = true;
                break;
            }
            rows.push(row);
        }
    }

    let column_names: Vec<String> = match rows.first() {
        Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
        None => match (&mut *conn).prepare(sql).await {
            Ok(statement) => statement
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
            Err(err) => {
                // e.g. DDL that removed the object it names
                debug!("No column names for empty result: {}", err);
                Vec::new()
            }
        },
    };

    let mut cells = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut values = Vec::with_capacity(column_names.len());
        for index in 0..row.columns().len() {
            values.push(decode_cell(row, index)?);
        }
        cells.push(values);
    }

    Ok(Table::new(column_names, cells).with_truncated(truncated))
}

/// Decode one cell by its runtime storage class.
fn decode_cell(row: &SqliteRow, index: usize) -> std::result::Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_ascii_uppercase();

    let value = match type_name.as_str() {
        "INTEGER" | "BIGINT" | "INT8" | "BOOLEAN" => {
            Value::from(row.try_get_unchecked::<i64, _>(index)?)
        }
        "REAL" | "NUMERIC" | "FLOAT" | "DOUBLE" => {
            let v = row.try_get_unchecked::<f64, _>(index)?;
            Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
        }
        "BLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Value::String(hex::encode(bytes))
        }
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };

    Ok(value)
}
