//! # Export Errors

use thiserror::Error;

use crate::errors::ErrorCode;
use crate::format::FormatError;
use crate::metadata::MetadataError;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Row export errors
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parquet read error: {0}")]
    ParquetError(String),

    #[error("Column '{0}' has no counterpart in the row data")]
    MissingColumn(String),

    #[error("Row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: u64,
        expected: usize,
        found: usize,
    },

    #[error("Column '{column}': value {value} does not fit a signed 64-bit integer")]
    ValueOutOfRange { column: String, value: u64 },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl ExportError {
    /// Returns the crate-wide error code
    pub fn code(&self) -> ErrorCode {
        match self {
            ExportError::IoError(_) | ExportError::ParquetError(_) => ErrorCode::IoError,
            ExportError::MissingColumn(_) => ErrorCode::MetadataParseError,
            ExportError::RowWidth { .. } | ExportError::ValueOutOfRange { .. } => {
                ErrorCode::ValueEncodingMismatch
            }
            ExportError::Metadata(e) => e.code(),
            ExportError::Format(e) => e.code(),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::IoError(e.to_string())
    }
}

impl From<parquet::errors::ParquetError> for ExportError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        ExportError::ParquetError(e.to_string())
    }
}
