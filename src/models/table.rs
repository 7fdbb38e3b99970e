//! Dynamically typed tabular results.
//!
//! Reports and ad-hoc statements return arbitrary column sets, so their
//! results are carried as JSON cells with a per-column kind inferred from
//! the values actually returned.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of values held by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
    /// No non-null value was seen.
    Null,
}

impl ColumnKind {
    /// Kind of a single cell.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Integer,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Real,
            _ => Self::Text,
        }
    }

    /// Combine the kinds of two cells of the same column.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Null, k) | (k, Self::Null) => k,
            (a, b) if a == b => a,
            (Self::Integer, Self::Real) | (Self::Real, Self::Integer) => Self::Real,
            _ => Self::Text,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// A tabular query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
    /// True when rows were dropped to honour a row cap.
    #[serde(default)]
    pub truncated: bool,
}

impl Table {
    /// Build a table, inferring each column's kind from its cells.
    ///
    /// Rows shorter than the header are padded with nulls.
    pub fn new(column_names: Vec<String>, mut rows: Vec<Vec<Value>>) -> Self {
        let width = column_names.len();
        let mut kinds = vec![ColumnKind::Null; width];

        for row in &mut rows {
            row.resize(width, Value::Null);
            for (kind, cell) in kinds.iter_mut().zip(row.iter()) {
                *kind = kind.merge(ColumnKind::of(cell));
            }
        }

        let columns = column_names
            .into_iter()
            .zip(kinds)
            .map(|(name, kind)| Column { name, kind })
            .collect();

        Self {
            columns,
            rows,
            truncated: false,
        }
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Cells of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}

/// Numeric value of a cell, if it has one.
pub fn cell_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Display label for a categorical cell.
pub fn cell_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "(null)".to_string(),
        other => other.to_string(),
    }
}
