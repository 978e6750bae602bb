//! Error types for the range engine and the workbook I/O around it.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is terminal for the invocation that raised it.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed `<letter><row>` coordinate
    #[error("Invalid cell address '{address}': {reason}")]
    InvalidAddress { address: String, reason: &'static str },

    /// Conflicting or missing stop condition / insertion strategy
    #[error("Ambiguous range specification: {0}")]
    AmbiguousRangeSpec(&'static str),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Cannot open workbook {}: {reason}", path.display())]
    CorruptWorkbook { path: PathBuf, reason: String },

    #[error("Delimiter '{0}' not found")]
    DelimiterNotFound(String),

    #[error("No empty rows found in range {start}:{end}")]
    NoEmptyRowAvailable { start: String, end: String },

    /// Parameter combination rejected before any workbook is touched
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Cannot save workbook {}: {reason}", path.display())]
    Save { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn invalid_address(address: &str, reason: &'static str) -> Self {
        Error::InvalidAddress {
            address: address.to_string(),
            reason,
        }
    }
}
