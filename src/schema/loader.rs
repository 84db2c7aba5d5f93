//! Schema document files
//!
//! A schema file holds one record document in JSON form (`.avsc` by
//! convention). Unreadable or malformed files are FATAL for the input that
//! referenced them.

use std::fs;
use std::path::Path;

use super::bridge::to_column_descriptors;
use super::document::{SchemaDocument, SchemaParser};
use super::errors::{SchemaError, SchemaResult};
use super::types::ColumnSchema;

/// Reads and writes schema document files with a fixed parser configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaLoader {
    parser: SchemaParser,
}

impl SchemaLoader {
    pub fn new(parser: SchemaParser) -> Self {
        Self { parser }
    }

    /// Returns the parser used for every file
    pub fn parser(&self) -> &SchemaParser {
        &self.parser
    }

    /// Loads a schema document from `path`.
    pub fn load_document(&self, path: &Path) -> SchemaResult<SchemaDocument> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::unreadable(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        self.parser.parse_str(&content).map_err(|e| {
            if e.field().is_some() || e.is_unsupported_shape() {
                e
            } else {
                SchemaError::unreadable(path.display().to_string(), e.message())
            }
        })
    }

    /// Loads a schema document and converts it to column descriptors.
    pub fn load_columns(&self, path: &Path) -> SchemaResult<ColumnSchema> {
        let document = self.load_document(path)?;
        to_column_descriptors(&document)
    }

    /// Writes a document to `path` as pretty-printed JSON
    pub fn save_document(&self, document: &SchemaDocument, path: &Path) -> SchemaResult<()> {
        let content = serde_json::to_string_pretty(&document.to_value()).map_err(|e| {
            SchemaError::unreadable(
                path.display().to_string(),
                format!("Failed to serialize schema: {}", e),
            )
        })?;

        fs::write(path, content).map_err(|e| {
            SchemaError::unreadable(path.display().to_string(), format!("Failed to write file: {}", e))
        })
    }
}
