//! CLI-specific error types
//!
//! Failures of a single input carry the code of the subsystem that raised
//! them, so the batch log names the real cause.

use std::fmt;
use std::io;

use crate::errors::ErrorCode;
use crate::export::ExportError;
use crate::metadata::MetadataError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or option error
    ConfigError,
    /// I/O error outside any subsystem
    IoError,
    /// Input file extension does not match the command
    UnexpectedExtension,
    /// One or more inputs of a batch failed
    BatchFailed,
    /// Failure raised by a subsystem
    Subsystem(ErrorCode),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DL_CLI_CONFIG_ERROR",
            Self::IoError => "DL_CLI_IO_ERROR",
            Self::UnexpectedExtension => "DL_CLI_UNEXPECTED_EXTENSION",
            Self::BatchFailed => "DL_CLI_BATCH_FAILED",
            Self::Subsystem(code) => code.code(),
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Input whose extension is not one of `expected`
    pub fn unexpected_extension(path: &std::path::Path, expected: &[&str]) -> Self {
        Self::new(
            CliErrorCode::UnexpectedExtension,
            format!("{}: expected a .{} file", path.display(), expected.join(" or .")),
        )
    }

    /// Batch summary after `failed` of `total` inputs failed
    pub fn batch_failed(command: &str, failed: usize, total: usize) -> Self {
        Self::new(
            CliErrorCode::BatchFailed,
            format!("{}: {} of {} inputs failed", command, failed, total),
        )
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::Subsystem(e.code()), e.message())
    }
}

impl From<MetadataError> for CliError {
    fn from(e: MetadataError) -> Self {
        Self::new(CliErrorCode::Subsystem(e.code()), format!("{}: {}", e.field(), e.message()))
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::Metadata(inner) => inner.into(),
            other => Self::new(CliErrorCode::Subsystem(other.code()), other.to_string()),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
