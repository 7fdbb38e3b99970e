//! Chart descriptions returned alongside tabular results.
//!
//! Charts are data, not images: a client draws them from the categories,
//! values and colour intensities given here.

use serde::Serialize;

/// Which chart was selected for a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Chart {
    Bar(BarChart),
    Pie(PieChart),
}

impl Chart {
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Bar(_) => ChartKind::Bar,
            Self::Pie(_) => ChartKind::Pie,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Bar(bar) => &bar.title,
            Self::Pie(pie) => &pie.title,
        }
    }
}

/// Bar chart: categories on the x axis, values on the y axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    /// Column used for the category axis.
    pub x: String,
    /// Column used for the value axis and colour scale.
    pub y: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub category: String,
    pub value: f64,
    /// Colour intensity in `[0, 1]`, scaled between the smallest and largest value.
    pub intensity: f64,
}

/// Pie chart segmented by a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    /// Column naming the segments.
    pub names: String,
    /// Column sizing the segments.
    pub values: String,
    pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}
