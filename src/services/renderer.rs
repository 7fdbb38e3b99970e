//! Chart selection for tabular results.
//!
//! Policy, first match wins:
//! 1. a percentage column gives a pie chart sized by that column;
//! 2. exactly two columns with a numeric second column give a bar chart;
//! 3. anything else is shown as a table only.

use crate::models::{cell_as_f64, cell_label, Bar, BarChart, Chart, ColumnKind, PieChart, Slice, Table};

/// Choose and build a chart for `table`, or `None` for table-only display.
pub fn select_chart(title: &str, table: &Table) -> Option<Chart> {
    if table.is_empty() {
        return None;
    }

    if let Some(pct) = percentage_column(table) {
        return pie_chart(title, table, pct);
    }

    if table.column_count() == 2 && table.columns[1].kind.is_numeric() {
        return Some(bar_chart(title, table));
    }

    None
}

/// Whether a column name denotes a percentage value.
pub fn is_percentage_column(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name == "pct"
        || name.ends_with("_pct")
        || name.starts_with("pct_")
        || name.contains("percent")
}

fn percentage_column(table: &Table) -> Option<usize> {
    table
        .columns
        .iter()
        .position(|c| is_percentage_column(&c.name) && c.kind != ColumnKind::Text)
}

fn pie_chart(title: &str, table: &Table, pct: usize) -> Option<Chart> {
    // Prefer a text column for segment names, else the first other column.
    let names = table
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != pct)
        .find(|(_, c)| c.kind == ColumnKind::Text)
        .or_else(|| table.columns.iter().enumerate().find(|(i, _)| *i != pct))
        .map(|(i, _)| i)?;

    let slices = table
        .rows
        .iter()
        .map(|row| Slice {
            label: cell_label(&row[names]),
            value: cell_as_f64(&row[pct]).unwrap_or(0.0),
        })
        .collect();

    Some(Chart::Pie(PieChart {
        title: title.to_string(),
        names: table.columns[names].name.clone(),
        values: table.columns[pct].name.clone(),
        slices,
    }))
}

fn bar_chart(title: &str, table: &Table) -> Chart {
    let values: Vec<f64> = table
        .column_values(1)
        .map(|v| cell_as_f64(v).unwrap_or(0.0))
        .collect();

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let bars = table
        .column_values(0)
        .zip(values.iter())
        .map(|(category, &value)| Bar {
            category: cell_label(category),
            value,
            intensity: if span > 0.0 { (value - min) / span } else { 1.0 },
        })
        .collect();

    Chart::Bar(BarChart {
        title: title.to_string(),
        x: table.columns[0].name.clone(),
        y: table.columns[1].name.clone(),
        bars,
    })
}
