//! Rendering: chart artifacts from aggregates, and paginated PDF assembly.
//!
//! Charts are written as PNG files into a caller-supplied scratch directory;
//! the document embeds them and owns the page-break discipline. Pagination
//! decisions live in [`layout`] as pure functions so the contract is
//! testable without a PDF backend.

pub mod charts;
pub mod document;
pub mod layout;

pub use charts::{render_bar_chart, render_histogram, render_line_chart, ChartArtifact, ChartStyle};
pub use document::{Block, ReportDocument, TableBlock};
