//! Application-wide error type shared by every pipeline stage.

/// Common result type for the pipeline crates.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors raised across the report pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Input source does not exist at the given location.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// Input source exists but could not be parsed as a table.
    #[error("source malformed: {0}")]
    SourceMalformed(String),

    /// A grouping or measure field is absent from the table schema.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A reduction was requested over a field with no numeric values.
    #[error("field is not numeric: {0}")]
    NonNumericField(String),

    /// A chart or document artifact failed to render or save.
    #[error("render error: {0}")]
    Render(String),

    /// A remote transfer failed. Local artifacts remain valid.
    #[error("publish error: {0}")]
    Publish(String),

    /// An external tool exited with a nonzero status.
    #[error("external tool failed ({command}, exit {status}): {stderr}")]
    ExternalTool {
        /// Command line that was invoked.
        command: String,
        /// Exit status reported by the tool.
        status: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
