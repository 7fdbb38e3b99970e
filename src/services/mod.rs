//! Service layer for Surplus.
//!
//! - Catalogue (named report statements)
//! - Renderer (chart selection for tabular results)
//! - Reporting (report and ad-hoc execution)

pub mod catalogue;
pub mod renderer;
mod reporting;

pub use catalogue::{catalogue, Report, ReportSummary};
pub use renderer::select_chart;
pub use reporting::{is_read_statement, is_single_statement, RenderedResult, ReportOutcome, ReportingService};
