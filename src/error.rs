use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, RosterError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests or queries a roster workbook.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Wrapper for IO failures such as reading the uploaded file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the Excel reader implementation. Raised only
    /// when the workbook itself cannot be opened; individual sheet failures
    /// are recorded per sheet and never reach this variant.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::Error),

    /// Raised when JSON serialization of query output fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
