//! Shared building blocks for the finreport pipeline crates.

pub mod auth;
pub mod error;
pub mod format;

pub use auth::{salted_digest, GateConfig};
pub use error::{ReportError, Result};
pub use format::{format_count, format_currency, format_percent, wrap_text};
