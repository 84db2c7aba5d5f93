//! Metadata envelope
//!
//! Bundle of a table's column schema, its free-form key/value properties and
//! the writer identifier. Built fresh by whichever codec reads it.

use std::collections::BTreeMap;

use crate::schema::{to_column_descriptors, ColumnSchema, SchemaDocument, SchemaParser};

use super::errors::{MetadataError, MetadataResult};

/// Property key whose value is an embedded schema document
pub const AVRO_SCHEMA_KEY: &str = "parquet.avro.schema";

/// Schema, properties and provenance of one table
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEnvelope {
    pub schema: ColumnSchema,
    /// Properties, kept sorted by key
    pub key_value_metadata: BTreeMap<String, String>,
    /// Writer identifier
    pub created_by: Option<String>,
}

impl MetadataEnvelope {
    pub fn new(schema: ColumnSchema) -> Self {
        Self {
            schema,
            key_value_metadata: BTreeMap::new(),
            created_by: None,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.key_value_metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    /// Returns the property value for `key`
    pub fn property(&self, key: &str) -> Option<&str> {
        self.key_value_metadata.get(key).map(String::as_str)
    }

    /// Parses the embedded schema document, if the reserved key is present
    pub fn embedded_schema(&self, parser: &SchemaParser) -> MetadataResult<Option<SchemaDocument>> {
        let Some(text) = self.property(AVRO_SCHEMA_KEY) else {
            return Ok(None);
        };
        let field = format!("keyValueMetaData.{}", AVRO_SCHEMA_KEY);
        parser
            .parse_str(text)
            .map(Some)
            .map_err(|e| MetadataError::schema_rejected(field, &e))
    }

    /// Column schema a schema-aware reader would use: the embedded document
    /// when present, otherwise the native schema.
    pub fn reader_schema(&self, parser: &SchemaParser) -> MetadataResult<ColumnSchema> {
        match self.embedded_schema(parser)? {
            Some(document) => to_column_descriptors(&document).map_err(|e| {
                MetadataError::schema_rejected(format!("keyValueMetaData.{}", AVRO_SCHEMA_KEY), &e)
            }),
            None => Ok(self.schema.clone()),
        }
    }
}
