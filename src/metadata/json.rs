//! JSON document form of the metadata envelope
//!
//! ```json
//! {
//!   "schema": { "type": "record", ... },
//!   "keyValueMetaData": {
//!     "writer.model.name": "avro",
//!     "parquet.avro.schema": { "type": "record", ... }
//!   },
//!   "createdBy": "parquet-mr version 1.12.3"
//! }
//! ```
//!
//! The schema and the reserved `parquet.avro.schema` property are embedded as
//! JSON objects so the document stays editable by hand. Reading turns the
//! reserved property back into compact JSON text.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::ser::{self, SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use serde_json::Value;

use crate::schema::{from_column_descriptors, to_column_descriptors, SchemaParser};

use super::envelope::{MetadataEnvelope, AVRO_SCHEMA_KEY};
use super::errors::{MetadataError, MetadataResult};

const SCHEMA: &str = "schema";
const KEY_VALUE_METADATA: &str = "keyValueMetaData";
const CREATED_BY: &str = "createdBy";
const ROOT: &str = "$";

/// Separates a field path from the reason in serde error messages
const PATH_SEPARATOR: &str = ": ";

fn property_path(key: &str) -> String {
    format!("{}.{}", KEY_VALUE_METADATA, key)
}

fn field_message(path: &str, reason: impl std::fmt::Display) -> String {
    format!("{}{}{}", path, PATH_SEPARATOR, reason)
}

/// The document as written to disk
#[derive(Debug, Serialize, Deserialize)]
struct MetadataDocument {
    schema: Value,
    #[serde(
        rename = "keyValueMetaData",
        default,
        serialize_with = "serialize_properties",
        deserialize_with = "deserialize_properties"
    )]
    key_value_metadata: BTreeMap<String, String>,
    #[serde(rename = "createdBy", default, deserialize_with = "deserialize_created_by")]
    created_by: Option<String>,
}

/// Embeds the reserved schema property as a JSON object
fn serialize_properties<S: Serializer>(
    properties: &BTreeMap<String, String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(properties.len()))?;
    for (key, value) in properties {
        if key == AVRO_SCHEMA_KEY {
            let node = embed_json(value).map_err(|reason| {
                <S::Error as ser::Error>::custom(field_message(&property_path(key), reason))
            })?;
            map.serialize_entry(key, &node)?;
        } else {
            map.serialize_entry(key, value)?;
        }
    }
    map.end()
}

/// Reads string properties; the reserved schema property may be an object
fn deserialize_properties<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let entries = match Option::<Value>::deserialize(deserializer)? {
        None => return Ok(BTreeMap::new()),
        Some(Value::Object(entries)) => entries,
        Some(_) => {
            return Err(<D::Error as de::Error>::custom(field_message(
                KEY_VALUE_METADATA,
                "expected an object",
            )))
        }
    };

    let mut properties = BTreeMap::new();
    for (key, node) in entries {
        let text = match node {
            Value::String(text) => text,
            nested if key == AVRO_SCHEMA_KEY => nested.to_string(),
            _ => {
                return Err(<D::Error as de::Error>::custom(field_message(
                    &property_path(&key),
                    "expected a string",
                )))
            }
        };
        properties.insert(key, text);
    }
    Ok(properties)
}

fn deserialize_created_by<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(<D::Error as de::Error>::custom(field_message(
            CREATED_BY,
            "expected a string",
        ))),
    }
}

/// Maps a serde failure onto the field it names, or the document root
fn document_error(err: serde_json::Error) -> MetadataError {
    let text = err.to_string();
    if err.classify() == Category::Data {
        if let Some((path, reason)) = text.split_once(PATH_SEPARATOR) {
            if path == CREATED_BY || path.starts_with(KEY_VALUE_METADATA) {
                return MetadataError::parse(path, reason);
            }
        }
        if text.starts_with("missing field `schema`") {
            return MetadataError::parse(SCHEMA, "missing");
        }
    }
    MetadataError::parse(ROOT, text)
}

/// Converts envelopes to and from their JSON document form
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataJsonCodec {
    parser: SchemaParser,
}

impl MetadataJsonCodec {
    /// Create a codec that parses embedded schemas with `parser`
    pub fn new(parser: SchemaParser) -> Self {
        Self { parser }
    }

    /// Encodes an envelope as pretty-printed JSON text
    pub fn to_json(&self, envelope: &MetadataEnvelope) -> MetadataResult<String> {
        let value = self.to_value(envelope)?;
        serde_json::to_string_pretty(&value).map_err(document_error)
    }

    /// Encodes an envelope as a JSON value
    pub fn to_value(&self, envelope: &MetadataEnvelope) -> MetadataResult<Value> {
        let document = MetadataDocument {
            schema: from_column_descriptors(&envelope.schema).to_value(),
            key_value_metadata: envelope.key_value_metadata.clone(),
            created_by: envelope.created_by.clone(),
        };
        serde_json::to_value(&document).map_err(document_error)
    }

    /// Decodes an envelope from JSON text
    pub fn from_json(&self, text: &str) -> MetadataResult<MetadataEnvelope> {
        let document: MetadataDocument = serde_json::from_str(text).map_err(document_error)?;
        self.from_document(document)
    }

    /// Decodes an envelope from a JSON value
    pub fn from_value(&self, value: &Value) -> MetadataResult<MetadataEnvelope> {
        let document = MetadataDocument::deserialize(value).map_err(document_error)?;
        self.from_document(document)
    }

    fn from_document(&self, document: MetadataDocument) -> MetadataResult<MetadataEnvelope> {
        let parsed = self
            .parser
            .parse_value(&document.schema)
            .map_err(|e| MetadataError::schema_rejected(SCHEMA, &e))?;
        let schema =
            to_column_descriptors(&parsed).map_err(|e| MetadataError::schema_rejected(SCHEMA, &e))?;

        let mut envelope = MetadataEnvelope::new(schema);
        envelope.key_value_metadata = document.key_value_metadata;
        envelope.created_by = document.created_by;
        Ok(envelope)
    }
}

/// Re-embeds a property holding JSON text as a nested node. Values written
/// with escaped quotes are unescaped first.
fn embed_json(text: &str) -> Result<Value, String> {
    if let Ok(node) = serde_json::from_str::<Value>(text) {
        return Ok(node);
    }
    serde_json::from_str(&text.replace("\\\"", "\"")).map_err(|e| e.to_string())
}
