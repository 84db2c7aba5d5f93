//! Footer Interoperability Tests
//!
//! Footer-only files written by the binary codec must be accepted by an
//! independent Parquet reader:
//! - Trailer framing (magic, length, magic)
//! - Schema elements with their annotations
//! - Key/value metadata and writer identifier
//! - Zero row groups

use std::fs::{self, File};

use dataload::footer::{read_footer, read_footer_file, write_footer_file, MAGIC};
use dataload::metadata::{MetadataEnvelope, AVRO_SCHEMA_KEY};
use dataload::schema::{
    ColumnDescriptor, ColumnSchema, ColumnType, EffectiveType, EnumType, LogicalType, PrimitiveKind,
};
use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::file::footer::decode_metadata;
use parquet::file::metadata::ParquetMetaDataWriter;
use parquet::file::reader::{FileReader, SerializedFileReader};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn order_schema() -> ColumnSchema {
    ColumnSchema::new(
        "order",
        vec![
            ColumnDescriptor::new("id", ColumnType::Logical(LogicalType::Uuid)),
            ColumnDescriptor::new("qty", ColumnType::Int32),
            ColumnDescriptor::nullable(
                "amount",
                ColumnType::Logical(LogicalType::Decimal { precision: 12, scale: 3 }),
            ),
            ColumnDescriptor::new("placed", ColumnType::Logical(LogicalType::TimestampMillis)),
            ColumnDescriptor::new("day", ColumnType::Logical(LogicalType::Date)),
            ColumnDescriptor::new(
                "status",
                ColumnType::Enum(EnumType::new("Status", vec!["OPEN".into(), "CLOSED".into()])),
            ),
            ColumnDescriptor::nullable("ratio", ColumnType::Float64),
        ],
    )
    .unwrap()
}

fn order_envelope() -> MetadataEnvelope {
    MetadataEnvelope::new(order_schema())
        .with_property("writer.model.name", "avro")
        .with_property(AVRO_SCHEMA_KEY, r#"{"type":"record","name":"order","fields":[]}"#)
        .with_created_by("parquet-mr version 1.12.3 (build f8dced182c4c1fbdec6ccb3185537b5a01e6ed6b)")
}

// =============================================================================
// Framing Tests
// =============================================================================

/// The file starts and ends with the magic and the length word is exact.
#[test]
fn test_footer_only_file_layout() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("order.parquet");
    let written = write_footer_file(&order_envelope(), &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), written);
    assert_eq!(&bytes[..4], MAGIC);
    assert_eq!(&bytes[bytes.len() - 4..], MAGIC);

    let n = bytes.len();
    let length = i32::from_le_bytes([bytes[n - 8], bytes[n - 7], bytes[n - 6], bytes[n - 5]]);
    assert_eq!(length as usize, n - 12);
}

// =============================================================================
// Independent Reader Tests
// =============================================================================

/// The parquet crate opens the file and sees the same metadata.
#[test]
fn test_parquet_crate_reads_footer() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("order.parquet");
    write_footer_file(&order_envelope(), &path).unwrap();

    let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
    let metadata = reader.metadata();
    assert_eq!(metadata.num_row_groups(), 0);

    let file_metadata = metadata.file_metadata();
    assert_eq!(file_metadata.version(), 1);
    assert_eq!(file_metadata.num_rows(), 0);
    assert_eq!(
        file_metadata.created_by(),
        Some("parquet-mr version 1.12.3 (build f8dced182c4c1fbdec6ccb3185537b5a01e6ed6b)")
    );

    let kv = file_metadata.key_value_metadata().unwrap();
    let keys: Vec<&str> = kv.iter().map(|kv| kv.key.as_str()).collect();
    assert_eq!(keys, vec![AVRO_SCHEMA_KEY, "writer.model.name"]);
    assert_eq!(kv[1].value.as_deref(), Some("avro"));

    let schema = file_metadata.schema_descr();
    assert_eq!(schema.root_schema().name(), "order");
    assert_eq!(schema.num_columns(), 7);

    let names: Vec<String> = (0..schema.num_columns())
        .map(|i| schema.column(i).name().to_string())
        .collect();
    assert_eq!(names, vec!["id", "qty", "amount", "placed", "day", "status", "ratio"]);
}

/// Physical types, converted types and repetition follow the mapping table.
#[test]
fn test_parquet_crate_sees_annotations() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("order.parquet");
    write_footer_file(&order_envelope(), &path).unwrap();

    let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
    let schema = reader.metadata().file_metadata().schema_descr();

    let expected = [
        (PhysicalType::BYTE_ARRAY, ConvertedType::UTF8, Repetition::REQUIRED),
        (PhysicalType::INT32, ConvertedType::NONE, Repetition::REQUIRED),
        (PhysicalType::BYTE_ARRAY, ConvertedType::DECIMAL, Repetition::OPTIONAL),
        (PhysicalType::INT64, ConvertedType::TIMESTAMP_MILLIS, Repetition::REQUIRED),
        (PhysicalType::INT32, ConvertedType::DATE, Repetition::REQUIRED),
        (PhysicalType::BYTE_ARRAY, ConvertedType::ENUM, Repetition::REQUIRED),
        (PhysicalType::DOUBLE, ConvertedType::NONE, Repetition::OPTIONAL),
    ];
    for (i, (physical, converted, repetition)) in expected.into_iter().enumerate() {
        let column = schema.column(i);
        assert_eq!(column.physical_type(), physical, "column {}", column.name());
        assert_eq!(column.converted_type(), converted, "column {}", column.name());
        assert_eq!(
            column.self_type().get_basic_info().repetition(),
            repetition,
            "column {}",
            column.name()
        );
    }

    let amount = schema.column(2);
    assert_eq!(amount.type_precision(), 12);
    assert_eq!(amount.type_scale(), 3);
}

/// Writing then reading the footer gives back the same envelope.
#[test]
fn test_footer_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("order.parquet");
    write_footer_file(&order_envelope(), &path).unwrap();

    let decoded = read_footer_file(&path).unwrap();
    assert_eq!(decoded.key_value_metadata, order_envelope().key_value_metadata);
    assert_eq!(decoded.created_by, order_envelope().created_by);

    // ENUM and UUID annotations come back as plain strings
    let columns = decoded.schema.columns();
    let string = EffectiveType::Primitive(PrimitiveKind::String);
    assert_eq!(columns[0].effective_type(), string);
    assert_eq!(columns[5].effective_type(), string);
    assert_eq!(&columns[1..5], &order_schema().columns()[1..5]);
    assert_eq!(columns[6], order_schema().columns()[6]);
}

/// A trailer re-encoded by the parquet crate's own writer decodes to the
/// same envelope.
#[test]
fn test_crate_written_trailer_is_read_back() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("order.parquet");
    write_footer_file(&order_envelope(), &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    let n = bytes.len();
    let metadata = decode_metadata(&bytes[4..n - 8]).unwrap();

    let mut rewritten = MAGIC.to_vec();
    ParquetMetaDataWriter::new(&mut rewritten, &metadata).finish().unwrap();
    assert_eq!(&rewritten[rewritten.len() - 4..], MAGIC);

    assert_eq!(read_footer(&rewritten).unwrap(), read_footer(&bytes).unwrap());
}
