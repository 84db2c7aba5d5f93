//! Parquet file record source
//!
//! The file is opened once by the `parquet` crate's reader. The column schema
//! comes from the footer it already decoded, through
//! [`MetadataEnvelope::reader_schema`], so an embedded schema document wins
//! over the native one. Row data is decoded by the `parquet` crate's record
//! reader; its fields are matched to descriptors by column name once, at
//! open time.

use std::fs::File;
use std::path::Path;

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::reader::RowIter;
use parquet::record::Field;

use crate::footer::to_envelope;
use crate::format::RowValue;
use crate::metadata::MetadataEnvelope;
use crate::schema::{ColumnSchema, SchemaParser};

use super::errors::{ExportError, ExportResult};
use super::source::RecordSource;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Rows of a Parquet file
pub struct ParquetSource {
    schema: ColumnSchema,
    envelope: MetadataEnvelope,
    /// Position of each schema column in the native row
    positions: Vec<usize>,
    rows: RowIter<'static>,
    row_number: u64,
}

impl ParquetSource {
    /// Opens `path`, resolving its reader schema with `parser`.
    ///
    /// # Errors
    ///
    /// Fails when the footer is unreadable, when the schema has shapes the
    /// export cannot render, or when a schema column has no native column of
    /// the same name.
    pub fn open(path: &Path, parser: &SchemaParser) -> ExportResult<Self> {
        let reader = SerializedFileReader::new(File::open(path)?)?;
        let envelope = to_envelope(reader.metadata())?;
        let schema = envelope.reader_schema(parser)?;

        let native = envelope.schema.columns();
        let positions = schema
            .columns()
            .iter()
            .map(|column| {
                native
                    .iter()
                    .position(|candidate| candidate.name == column.name)
                    .ok_or_else(|| ExportError::MissingColumn(column.name.clone()))
            })
            .collect::<ExportResult<Vec<_>>>()?;

        log::debug!(
            "opened {} with {} columns and {} row groups",
            path.display(),
            schema.len(),
            reader.num_row_groups()
        );

        Ok(Self {
            schema,
            envelope,
            positions,
            rows: reader.into_iter(),
            row_number: 0,
        })
    }

    /// Footer metadata of the open file
    pub fn envelope(&self) -> &MetadataEnvelope {
        &self.envelope
    }
}

impl RecordSource for ParquetSource {
    fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    fn next_record(&mut self) -> ExportResult<Option<Vec<RowValue>>> {
        let row = match self.rows.next() {
            None => return Ok(None),
            Some(row) => row?,
        };
        self.row_number += 1;

        let fields: Vec<&Field> = row.get_column_iter().map(|(_, field)| field).collect();
        let mut values = Vec::with_capacity(self.positions.len());
        for (column, &position) in self.schema.columns().iter().zip(&self.positions) {
            let field = fields.get(position).ok_or(ExportError::RowWidth {
                row: self.row_number,
                expected: self.positions.len(),
                found: fields.len(),
            })?;
            values.push(field_value(&column.name, field)?);
        }
        Ok(Some(values))
    }
}

/// Converts a decoded field into the formatter's value model.
///
/// Dates become epoch milliseconds of the day start; microsecond timestamps
/// are floored to milliseconds.
fn field_value(column: &str, field: &Field) -> ExportResult<RowValue> {
    let value = match field {
        Field::Null => RowValue::Null,
        Field::Bool(v) => RowValue::Boolean(*v),
        Field::Byte(v) => RowValue::Int(i32::from(*v)),
        Field::Short(v) => RowValue::Int(i32::from(*v)),
        Field::Int(v) => RowValue::Int(*v),
        Field::Long(v) => RowValue::Long(*v),
        Field::UByte(v) => RowValue::Int(i32::from(*v)),
        Field::UShort(v) => RowValue::Int(i32::from(*v)),
        Field::UInt(v) => RowValue::Long(i64::from(*v)),
        Field::ULong(v) => RowValue::Long(i64::try_from(*v).map_err(|_| {
            ExportError::ValueOutOfRange {
                column: column.to_string(),
                value: *v,
            }
        })?),
        Field::Float(v) => RowValue::Float(*v),
        Field::Double(v) => RowValue::Double(*v),
        Field::Decimal(d) => RowValue::Bytes(d.data().to_vec()),
        Field::Str(s) => RowValue::String(s.clone()),
        Field::Bytes(b) => RowValue::Bytes(b.data().to_vec()),
        Field::Date(days) => RowValue::Long(i64::from(*days) * MILLIS_PER_DAY),
        Field::TimestampMillis(v) => RowValue::Long(*v),
        Field::TimestampMicros(v) => RowValue::Long(v.div_euclid(1_000)),
        Field::Group(_) => RowValue::Nested("record"),
        Field::ListInternal(_) => RowValue::Nested("array"),
        Field::MapInternal(_) => RowValue::Nested("map"),
        _ => RowValue::Nested("unsupported"),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_widening() {
        assert_eq!(field_value("c", &Field::Short(-3)).unwrap(), RowValue::Int(-3));
        assert_eq!(field_value("c", &Field::UInt(u32::MAX)).unwrap(), RowValue::Long(4_294_967_295));
        assert!(field_value("c", &Field::ULong(u64::MAX)).is_err());
    }

    #[test]
    fn test_temporal_fields_become_millis() {
        assert_eq!(field_value("d", &Field::Date(1)).unwrap(), RowValue::Long(86_400_000));
        assert_eq!(
            field_value("t", &Field::TimestampMicros(-1)).unwrap(),
            RowValue::Long(-1)
        );
        assert_eq!(
            field_value("t", &Field::TimestampMicros(1_999)).unwrap(),
            RowValue::Long(1)
        );
    }

    #[test]
    fn test_text_and_null() {
        assert_eq!(
            field_value("s", &Field::Str("Widget".into())).unwrap(),
            RowValue::from("Widget")
        );
        assert_eq!(field_value("s", &Field::Null).unwrap(), RowValue::Null);
    }
}
