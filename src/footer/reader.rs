//! Binary footer reader
//!
//! Locates the trailer from the end of a file, validates both magic markers
//! and the length word, then decodes the metadata into an envelope.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use parquet::file::footer::{decode_footer, decode_metadata};
use parquet::file::metadata::ParquetMetaData;

use crate::metadata::{MetadataEnvelope, MetadataError, MetadataResult};

use super::mapping::from_native;
use super::writer::MAGIC;

/// Leading magic, trailing length word and trailing magic
const FRAMING_LEN: usize = 12;

/// Length word plus trailing magic
const TAIL_LEN: usize = 8;

/// Decodes an envelope from a complete file image.
pub fn read_footer(bytes: &[u8]) -> MetadataResult<MetadataEnvelope> {
    if bytes.len() < FRAMING_LEN {
        return Err(MetadataError::footer(format!(
            "{} bytes is too short for a footer",
            bytes.len()
        )));
    }
    if &bytes[..4] != MAGIC {
        return Err(MetadataError::footer("missing leading magic"));
    }
    let end = bytes.len() - TAIL_LEN;
    let mut tail = [0u8; TAIL_LEN];
    tail.copy_from_slice(&bytes[end..]);
    let length = trailer_length(&tail, bytes.len() as u64)?;
    decode_envelope(&bytes[end - length..end])
}

/// Decodes the envelope of the file at `path`, reading only the trailer.
pub fn read_footer_file(path: &Path) -> MetadataResult<MetadataEnvelope> {
    let display = path.display().to_string();
    let io_err = |e: std::io::Error| MetadataError::io(&display, &e);

    let mut file = File::open(path).map_err(io_err)?;
    let file_len = file.metadata().map_err(io_err)?.len();
    if file_len < FRAMING_LEN as u64 {
        return Err(MetadataError::footer(format!(
            "{}: {} bytes is too short for a footer",
            display, file_len
        )));
    }

    let mut head = [0u8; 4];
    file.read_exact(&mut head).map_err(io_err)?;
    if &head != MAGIC {
        return Err(MetadataError::footer(format!("{}: missing leading magic", display)));
    }

    let mut tail = [0u8; TAIL_LEN];
    file.seek(SeekFrom::End(-(TAIL_LEN as i64))).map_err(io_err)?;
    file.read_exact(&mut tail).map_err(io_err)?;
    let length = trailer_length(&tail, file_len)?;

    let mut encoded = vec![0u8; length];
    file.seek(SeekFrom::End(-((TAIL_LEN + length) as i64)))
        .map_err(io_err)?;
    file.read_exact(&mut encoded).map_err(io_err)?;
    decode_envelope(&encoded)
}

/// Converts decoded Parquet metadata into an envelope.
///
/// Properties without a value become empty strings.
pub fn to_envelope(metadata: &ParquetMetaData) -> MetadataResult<MetadataEnvelope> {
    let file_metadata = metadata.file_metadata();
    let schema = from_native(file_metadata.schema())
        .map_err(|e| MetadataError::schema_rejected("schema", &e))?;
    let mut envelope = MetadataEnvelope::new(schema);
    for kv in file_metadata.key_value_metadata().into_iter().flatten() {
        envelope
            .key_value_metadata
            .insert(kv.key.clone(), kv.value.clone().unwrap_or_default());
    }
    envelope.created_by = file_metadata.created_by().map(str::to_string);
    Ok(envelope)
}

fn decode_envelope(encoded: &[u8]) -> MetadataResult<MetadataEnvelope> {
    let metadata = decode_metadata(encoded)?;
    to_envelope(&metadata)
}

/// Validates the last 8 bytes of a file and returns the metadata length
fn trailer_length(tail: &[u8; TAIL_LEN], file_len: u64) -> MetadataResult<usize> {
    let length = decode_footer(tail)?;
    if length as u64 > file_len - FRAMING_LEN as u64 {
        return Err(MetadataError::footer(format!(
            "metadata length {} does not fit a file of {} bytes",
            length, file_len
        )));
    }
    Ok(length)
}
