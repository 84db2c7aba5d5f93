//! Row streaming to comma-separated text
//!
//! Output is a header line of upper-cased column names followed by one line
//! per row. The header is produced only together with the first row, so a
//! source without rows yields no text at all.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::ErrorCode;
use crate::format::{FormatWarning, RowValue, ValueFormatter};

use super::errors::{ExportError, ExportResult};
use super::source::RecordSource;

const OUTPUT_BUFFER_SIZE: usize = 16 * 1024;

/// Lazily formatted lines of a record source, without line terminators
pub struct RowStream<S: RecordSource> {
    source: S,
    formatter: ValueFormatter,
    header_emitted: bool,
    pending: Option<Vec<RowValue>>,
    rows: u64,
    finished: bool,
}

impl<S: RecordSource> RowStream<S> {
    pub fn new(source: S, formatter: ValueFormatter) -> Self {
        Self {
            source,
            formatter,
            header_emitted: false,
            pending: None,
            rows: 0,
            finished: false,
        }
    }

    /// Data rows emitted so far
    pub fn rows_emitted(&self) -> u64 {
        self.rows
    }

    pub fn formatter(&self) -> &ValueFormatter {
        &self.formatter
    }

    pub fn formatter_mut(&mut self) -> &mut ValueFormatter {
        &mut self.formatter
    }

    fn header_line(&self) -> String {
        self.source.schema().header_names().join(",")
    }

    fn next_line(&mut self) -> ExportResult<Option<String>> {
        if !self.header_emitted {
            let Some(first) = self.source.next_record()? else {
                return Ok(None);
            };
            self.pending = Some(first);
            self.header_emitted = true;
            return Ok(Some(self.header_line()));
        }

        let values = match self.pending.take() {
            Some(values) => values,
            None => match self.source.next_record()? {
                Some(values) => values,
                None => return Ok(None),
            },
        };

        let columns = self.source.schema().columns();
        if values.len() != columns.len() {
            return Err(ExportError::RowWidth {
                row: self.rows + 1,
                expected: columns.len(),
                found: values.len(),
            });
        }
        let mut line = String::new();
        self.formatter.format_row(columns, &values, &mut line)?;
        self.rows += 1;
        Ok(Some(line))
    }
}

impl<S: RecordSource> Iterator for RowStream<S> {
    type Item = ExportResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Outcome of one export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Data rows written, header excluded
    pub rows: u64,
    /// Bytes written; zero when the output was removed
    pub bytes: u64,
    /// True when the output was empty and has been deleted
    pub removed_empty: bool,
    pub warnings: Vec<FormatWarning>,
}

impl ExportSummary {
    /// Returns the recoverable condition to report, if any
    pub fn warning_code(&self) -> Option<ErrorCode> {
        if self.removed_empty {
            Some(ErrorCode::EmptyOutputProduced)
        } else {
            self.warnings.first().map(|w| w.code)
        }
    }
}

/// Writes every line of `stream` to `sink`, each followed by `\n`.
///
/// Returns the number of bytes written.
pub fn write_lines<S: RecordSource, W: Write>(stream: &mut RowStream<S>, sink: &mut W) -> ExportResult<u64> {
    let mut bytes = 0u64;
    for line in stream.by_ref() {
        let line = line?;
        sink.write_all(line.as_bytes())?;
        sink.write_all(b"\n")?;
        bytes += line.len() as u64 + 1;
    }
    sink.flush()?;
    Ok(bytes)
}

/// Exports `source` to a file at `path`.
///
/// An export that produces no bytes deletes the file again and reports
/// `DL_EMPTY_OUTPUT_PRODUCED` in the summary. Any error removes the partial
/// file before returning.
pub fn export_to_path<S: RecordSource>(
    source: S,
    formatter: ValueFormatter,
    path: &Path,
) -> ExportResult<ExportSummary> {
    let mut stream = RowStream::new(source, formatter);
    let result = File::create(path).map_err(ExportError::from).and_then(|file| {
        let mut writer = BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, file);
        let bytes = write_lines(&mut stream, &mut writer)?;
        writer
            .into_inner()
            .map_err(|e| ExportError::IoError(e.error().to_string()))?
            .sync_all()?;
        Ok(bytes)
    });

    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            remove_output(path);
            return Err(e);
        }
    };

    let removed_empty = bytes == 0;
    if removed_empty {
        log::warn!(
            "{}: export of {} produced no rows, output removed",
            ErrorCode::EmptyOutputProduced.code(),
            path.display()
        );
        remove_output(path);
    }

    Ok(ExportSummary {
        rows: stream.rows_emitted(),
        bytes,
        removed_empty,
        warnings: stream.formatter_mut().take_warnings(),
    })
}

fn remove_output(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("failed to remove {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::VecSource;
    use crate::format::{TimeZoneSetting, EPOCH_START_SENTINEL_MILLIS};
    use crate::schema::{ColumnDescriptor, ColumnSchema, ColumnType, LogicalType};
    use tempfile::TempDir;

    fn sale_schema() -> ColumnSchema {
        ColumnSchema::new(
            "sale",
            vec![
                ColumnDescriptor::new("name", ColumnType::String),
                ColumnDescriptor::new(
                    "amount",
                    ColumnType::Logical(LogicalType::Decimal { precision: 10, scale: 2 }),
                ),
                ColumnDescriptor::nullable("when", ColumnType::Logical(LogicalType::TimestampMillis)),
            ],
        )
        .unwrap()
    }

    fn sale_row() -> Vec<RowValue> {
        vec![
            RowValue::from("Widget"),
            RowValue::Bytes(vec![0x30, 0x39]),
            RowValue::Long(EPOCH_START_SENTINEL_MILLIS),
        ]
    }

    fn formatter() -> ValueFormatter {
        ValueFormatter::new(TimeZoneSetting::utc())
    }

    #[test]
    fn test_header_then_rows() {
        let source = VecSource::new(sale_schema(), vec![sale_row(), vec![RowValue::from("Gadget"), RowValue::Bytes(vec![0xFF]), RowValue::Null]]);
        let lines: Vec<String> = RowStream::new(source, formatter())
            .collect::<ExportResult<_>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![
                "NAME,AMOUNT,WHEN",
                "'Widget',123.45,'1900-01-01T00:00:00.000-00:00'",
                "'Gadget',-0.01,null",
            ]
        );
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        let mut stream = RowStream::new(VecSource::new(sale_schema(), vec![]), formatter());
        assert!(stream.next().is_none());
        assert_eq!(stream.rows_emitted(), 0);
    }

    #[test]
    fn test_stream_stops_after_error() {
        let rows = vec![sale_row(), vec![RowValue::Long(1), RowValue::Null, RowValue::Null], sale_row()];
        let mut stream = RowStream::new(VecSource::new(sale_schema(), rows), formatter());
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_ok());
        let err = stream.next().unwrap().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValueEncodingMismatch);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_export_to_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sale.csv");
        let summary = export_to_path(VecSource::new(sale_schema(), vec![sale_row()]), formatter(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "NAME,AMOUNT,WHEN\n'Widget',123.45,'1900-01-01T00:00:00.000-00:00'\n"
        );
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.bytes, text.len() as u64);
        assert_eq!(summary.warning_code(), None);
    }

    #[test]
    fn test_empty_export_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");
        let summary = export_to_path(VecSource::new(sale_schema(), vec![]), formatter(), &path).unwrap();
        assert!(summary.removed_empty);
        assert_eq!(summary.warning_code(), Some(ErrorCode::EmptyOutputProduced));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_export_removes_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.csv");
        let rows = vec![sale_row(), vec![RowValue::from("x")]];
        let err = export_to_path(VecSource::new(sale_schema(), rows), formatter(), &path).unwrap_err();
        assert!(matches!(err, ExportError::RowWidth { row: 2, expected: 3, found: 1 }));
        assert!(!path.exists());
    }
}
