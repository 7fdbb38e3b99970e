//! Data models for Surplus.
//!
//! Result and chart types shared by the reporting service and the API.
//! Row types for the dataset tables live next to their queries in `db`.

mod chart;
mod table;

pub use chart::*;
pub use table::*;
