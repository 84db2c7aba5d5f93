//! Metadata Document Tests
//!
//! The JSON document form and the binary footer describe the same envelope:
//! - JSON -> footer -> JSON keeps properties and provenance
//! - The embedded schema document stays a JSON object in the document
//! - Schema documents survive the bridge to column descriptors and back

use std::fs::{self, File};

use dataload::cli::{self, Settings};
use dataload::errors::ErrorCode;
use dataload::footer::read_footer_file;
use dataload::metadata::{MetadataJsonCodec, AVRO_SCHEMA_KEY};
use dataload::schema::{
    from_column_descriptors, to_column_descriptors, ColumnType, LogicalType, SchemaParser,
};
use parquet::file::reader::{FileReader, SerializedFileReader};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn event_schema() -> Value {
    json!({
        "type": "record",
        "name": "event",
        "namespace": "com.example",
        "fields": [
            {"name": "id", "type": {"type": "string", "logicalType": "uuid"}},
            {"name": "kind", "type": {"type": "enum", "name": "Kind", "symbols": ["CREATED", "DELETED"]}},
            {"name": "at", "type": ["null", {"type": "long", "logicalType": "timestamp-millis"}], "default": null},
            {"name": "day", "type": {"type": "long", "logicalType": "date"}},
            {"name": "price", "type": ["null", {"type": "bytes", "logicalType": "decimal", "precision": 9, "scale": 4}]},
            {"name": "count", "type": "long"}
        ]
    })
}

fn event_document() -> Value {
    json!({
        "schema": event_schema(),
        "keyValueMetaData": {
            "parquet.avro.schema": event_schema(),
            "writer.model.name": "avro"
        },
        "createdBy": "parquet-mr version 1.12.3"
    })
}

// =============================================================================
// Document <-> Footer Tests
// =============================================================================

/// A document becomes a footer-only file that an independent reader accepts.
#[test]
fn test_from_json_builds_readable_file() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("event.json");
    fs::write(&input, serde_json::to_string_pretty(&event_document()).unwrap()).unwrap();

    let output = cli::from_json(&input, &Settings::default()).unwrap().unwrap();
    assert_eq!(output, tmp.path().join("event.parquet"));

    let reader = SerializedFileReader::new(File::open(&output).unwrap()).unwrap();
    let file_metadata = reader.metadata().file_metadata();
    assert_eq!(file_metadata.schema_descr().num_columns(), 6);
    assert_eq!(file_metadata.created_by(), Some("parquet-mr version 1.12.3"));

    let kv = file_metadata.key_value_metadata().unwrap();
    let embedded = kv.iter().find(|kv| kv.key == AVRO_SCHEMA_KEY).unwrap();
    let embedded: Value = serde_json::from_str(embedded.value.as_deref().unwrap()).unwrap();
    assert_eq!(embedded, event_schema());
}

/// Properties and provenance survive document -> footer -> document.
#[test]
fn test_document_footer_document() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("event.json");
    fs::write(&input, event_document().to_string()).unwrap();

    let settings = Settings::default();
    let parquet_path = cli::from_json(&input, &settings).unwrap().unwrap();
    fs::remove_file(&input).unwrap();
    let json_path = cli::to_json(&parquet_path, &settings).unwrap().unwrap();
    assert_eq!(json_path, input);

    let rebuilt: Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(rebuilt["keyValueMetaData"], event_document()["keyValueMetaData"]);
    assert_eq!(rebuilt["createdBy"], json!("parquet-mr version 1.12.3"));

    // the native schema keeps names and order, uuid and enum read back as strings
    let names: Vec<&str> = rebuilt["schema"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["id", "kind", "at", "day", "price", "count"]);
    assert_eq!(rebuilt["schema"]["fields"][0]["type"], json!("string"));
    assert_eq!(rebuilt["schema"]["fields"][1]["type"], json!("string"));
}

/// Properties written as escaped JSON text are still embedded as objects.
#[test]
fn test_escaped_embedded_schema() {
    let codec = MetadataJsonCodec::default();
    let mut document = event_document();
    document["keyValueMetaData"][AVRO_SCHEMA_KEY] = Value::String(event_schema().to_string());

    let envelope = codec.from_value(&document).unwrap();
    let value = codec.to_value(&envelope).unwrap();
    assert_eq!(value["keyValueMetaData"][AVRO_SCHEMA_KEY], event_schema());
}

/// The footer reader hands the embedded document back as compact text.
#[test]
fn test_reader_schema_uses_embedded_document() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("event.json");
    fs::write(&input, event_document().to_string()).unwrap();
    let output = cli::from_json(&input, &Settings::default()).unwrap().unwrap();

    let envelope = read_footer_file(&output).unwrap();
    let schema = envelope.reader_schema(&SchemaParser::new()).unwrap();
    assert_eq!(schema.namespace(), Some("com.example"));
    assert_eq!(
        schema.column("id").unwrap().effective_logical_type(),
        Some(LogicalType::Uuid)
    );
    assert!(matches!(schema.column("kind").unwrap().members()[0], ColumnType::Enum(_)));
}

// =============================================================================
// Schema Bridge Tests
// =============================================================================

/// Descriptors -> document -> descriptors is the identity.
#[test]
fn test_bridge_round_trip() {
    let document = SchemaParser::new().parse_value(&event_schema()).unwrap();
    let columns = to_column_descriptors(&document).unwrap();
    assert_eq!(columns.len(), 6);

    let rebuilt = to_column_descriptors(&from_column_descriptors(&columns)).unwrap();
    assert_eq!(rebuilt, columns);
    assert_eq!(
        rebuilt.column("price").unwrap().effective_logical_type(),
        Some(LogicalType::Decimal { precision: 9, scale: 4 })
    );
    assert!(rebuilt.column("at").unwrap().is_nullable());
}

/// Shapes without a flat column form are named in the rejection.
#[test]
fn test_bridge_rejects_nested_shapes() {
    let parser = SchemaParser::new();
    let shapes = [
        json!("bytes"),
        json!({"type": "map", "values": "long"}),
        json!({"type": "array", "items": "string"}),
        json!({"type": "fixed", "name": "Hash", "size": 16}),
        json!(["null", {"type": "record", "name": "Inner", "fields": []}]),
    ];
    for shape in shapes {
        let schema = json!({
            "type": "record",
            "name": "outer",
            "fields": [{"name": "payload", "type": shape}]
        });
        let document = parser.parse_value(&schema).unwrap();
        let err = to_column_descriptors(&document).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedSchemaShape);
        assert_eq!(err.field(), Some("payload"));
    }
}

/// Malformed documents fail the whole file with a field path.
#[test]
fn test_malformed_document_is_reported() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("broken.json");
    fs::write(&input, json!({"schema": event_schema(), "createdBy": 7}).to_string()).unwrap();

    let err = cli::from_json(&input, &Settings::default()).unwrap_err();
    assert_eq!(err.code_str(), "DL_METADATA_PARSE_ERROR");
    assert!(err.message().starts_with("createdBy"));
    assert!(!tmp.path().join("broken.parquet").exists());
}
