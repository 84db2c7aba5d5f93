//! Binary footer serializer
//!
//! Layout, in order:
//!
//! ```text
//! MAGIC(4) | FileMetaData (compact Thrift, N bytes) | N as i32 LE | MAGIC(4)
//! ```
//!
//! The `parquet` crate encodes everything after the leading magic. The
//! trailer is fully encoded before anything reaches the sink, so an encoding
//! failure never leaves a partial file image behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use parquet::file::metadata::{FileMetaData, KeyValue, ParquetMetaData, ParquetMetaDataWriter};
use parquet::schema::types::SchemaDescriptor;

use crate::metadata::{MetadataEnvelope, MetadataError, MetadataResult};

use super::mapping::to_native;

/// Marker at both ends of the trailer
pub const MAGIC: &[u8; 4] = b"PAR1";

/// Format version written to every footer
const FORMAT_VERSION: i32 = 1;

/// Builds the Parquet metadata for an envelope.
///
/// Properties are emitted sorted by key; the file holds no row groups.
pub fn to_parquet_metadata(envelope: &MetadataEnvelope) -> MetadataResult<ParquetMetaData> {
    let root = to_native(&envelope.schema)?;
    let properties: Vec<KeyValue> = envelope
        .key_value_metadata
        .iter()
        .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
        .collect();

    let file_metadata = FileMetaData::new(
        FORMAT_VERSION,
        0,
        envelope.created_by.clone(),
        (!properties.is_empty()).then_some(properties),
        Arc::new(SchemaDescriptor::new(root)),
        None,
    );
    Ok(ParquetMetaData::new(file_metadata, Vec::new()))
}

/// Writes the complete trailer for `envelope` to `sink`.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Fails with `DL_UNSUPPORTED_SCHEMA_SHAPE` when a column cannot be
/// represented natively, and with `DL_IO_ERROR` when the sink fails. After an
/// I/O failure the sink's trailing state is undefined and the output must be
/// discarded.
pub fn serialize_footer<W: Write>(envelope: &MetadataEnvelope, sink: &mut W) -> MetadataResult<usize> {
    let metadata = to_parquet_metadata(envelope)?;
    let mut trailer = Vec::new();
    ParquetMetaDataWriter::new(&mut trailer, &metadata).finish()?;

    let io_err = |e: std::io::Error| MetadataError::io("footer sink", &e);
    sink.write_all(MAGIC).map_err(io_err)?;
    sink.write_all(&trailer).map_err(io_err)?;

    Ok(MAGIC.len() + trailer.len())
}

/// Writes a footer-only file at `path`, removing it again on failure.
pub fn write_footer_file(envelope: &MetadataEnvelope, path: &Path) -> MetadataResult<usize> {
    let display = path.display().to_string();
    let result = File::create(path)
        .map_err(|e| MetadataError::io(&display, &e))
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            let written = serialize_footer(envelope, &mut writer)?;
            let file = writer
                .into_inner()
                .map_err(|e| MetadataError::io(&display, e.error()))?;
            file.sync_all().map_err(|e| MetadataError::io(&display, &e))?;
            Ok(written)
        });

    if result.is_err() && path.exists() {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("failed to remove partial footer file {}: {}", display, e);
        }
    }
    result
}
