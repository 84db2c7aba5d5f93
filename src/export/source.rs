//! Record sources
//!
//! A source yields rows whose values line up with its schema's columns.
//! Sources are single pass; reading again means opening a new source.

use crate::format::RowValue;
use crate::schema::ColumnSchema;

use super::errors::ExportResult;

/// Sequential supplier of rows
pub trait RecordSource {
    /// Columns every row follows, in order
    fn schema(&self) -> &ColumnSchema;

    /// Returns the next row, `None` once the source is exhausted
    fn next_record(&mut self) -> ExportResult<Option<Vec<RowValue>>>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn schema(&self) -> &ColumnSchema {
        (**self).schema()
    }

    fn next_record(&mut self) -> ExportResult<Option<Vec<RowValue>>> {
        (**self).next_record()
    }
}

/// Source over rows held in memory
#[derive(Debug)]
pub struct VecSource {
    schema: ColumnSchema,
    rows: std::vec::IntoIter<Vec<RowValue>>,
}

impl VecSource {
    pub fn new(schema: ColumnSchema, rows: Vec<Vec<RowValue>>) -> Self {
        Self {
            schema,
            rows: rows.into_iter(),
        }
    }
}

impl RecordSource for VecSource {
    fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    fn next_record(&mut self) -> ExportResult<Option<Vec<RowValue>>> {
        Ok(self.rows.next())
    }
}
