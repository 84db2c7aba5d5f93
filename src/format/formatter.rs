//! Logical-type-aware value formatter
//!
//! Renders one cell as text for the comma-separated export:
//!
//! | Effective type | Output |
//! |---|---|
//! | null value | `null` |
//! | Date / TimeMillis / TimestampMillis | `'2024-01-31T08:00:00.000+01:00'` |
//! | Decimal | `123.45` |
//! | Uuid | `'3f2504e0-4f89-11d3-9a0c-0305e82c3301'`, or `'unknown'` |
//! | string / enum | `'text'` |
//! | numbers / boolean | natural text, floats expanded exactly |
//!
//! Union columns are rendered by their effective type, not by their first
//! declared branch.

use uuid::Uuid;

use crate::errors::ErrorCode;
use crate::schema::{ColumnDescriptor, EffectiveType, LogicalType, PrimitiveKind};

use super::decimal::{decimal_to_string, f32_to_string, f64_to_string};
use super::errors::{FormatError, FormatResult, FormatWarning};
use super::timezone::TimeZoneSetting;
use super::value::RowValue;

/// Epoch-start marker written by upstream loaders
pub const EPOCH_START_SENTINEL_MILLIS: i64 = -2_208_988_800_000;
pub const EPOCH_START_SENTINEL_TEXT: &str = "1900-01-01T00:00:00.000-00:00";

/// Parse-error marker written by upstream loaders
pub const PARSE_ERROR_SENTINEL_MILLIS: i64 = -2_208_902_400_000;
pub const PARSE_ERROR_SENTINEL_TEXT: &str = "1900-01-02T00:00:00.000-00:00";

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";
const NULL_TEXT: &str = "null";
const UNKNOWN_UUID_TEXT: &str = "unknown";
const HYPHENATED_UUID_LEN: usize = 36;

/// Formats values and collects recoverable warnings
#[derive(Debug, Default)]
pub struct ValueFormatter {
    zone: TimeZoneSetting,
    warnings: Vec<FormatWarning>,
}

impl ValueFormatter {
    pub fn new(zone: TimeZoneSetting) -> Self {
        Self {
            zone,
            warnings: Vec::new(),
        }
    }

    pub fn zone(&self) -> TimeZoneSetting {
        self.zone
    }

    /// Warnings recorded since the last [`ValueFormatter::take_warnings`]
    pub fn warnings(&self) -> &[FormatWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<FormatWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Renders `value` as text for `column`
    pub fn format(&mut self, column: &ColumnDescriptor, value: &RowValue) -> FormatResult<String> {
        let mut out = String::new();
        self.format_into(column, value, &mut out)?;
        Ok(out)
    }

    /// Renders one row, comma-joined, in column order
    pub fn format_row(
        &mut self,
        columns: &[ColumnDescriptor],
        values: &[RowValue],
        out: &mut String,
    ) -> FormatResult<()> {
        for (i, (column, value)) in columns.iter().zip(values).enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.format_into(column, value, out)?;
        }
        Ok(())
    }

    /// Appends the text of `value` to `out`
    pub fn format_into(
        &mut self,
        column: &ColumnDescriptor,
        value: &RowValue,
        out: &mut String,
    ) -> FormatResult<()> {
        match value {
            RowValue::Null => {
                out.push_str(NULL_TEXT);
                return Ok(());
            }
            RowValue::Nested(shape) => {
                return Err(FormatError::UnsupportedFieldShape {
                    column: column.name.clone(),
                    shape: shape.to_string(),
                })
            }
            _ => {}
        }

        match column.effective_type() {
            EffectiveType::Logical(logical) => self.format_logical(column, logical, value, out),
            EffectiveType::Primitive(kind) => format_primitive(column, kind, value, out),
        }
    }

    fn format_logical(
        &mut self,
        column: &ColumnDescriptor,
        logical: LogicalType,
        value: &RowValue,
        out: &mut String,
    ) -> FormatResult<()> {
        match logical {
            LogicalType::Date | LogicalType::TimeMillis | LogicalType::TimestampMillis => {
                let millis = match value {
                    RowValue::Long(v) => *v,
                    RowValue::Int(v) => i64::from(*v),
                    other => return Err(mismatch(column, "int64", other)),
                };
                push_quoted(out, &self.format_millis(column, millis)?);
            }
            LogicalType::Decimal { scale, .. } => match value {
                RowValue::Bytes(bytes) => out.push_str(&decimal_to_string(bytes, scale)),
                other => return Err(mismatch(column, "bytes", other)),
            },
            LogicalType::Uuid => {
                let text = text_of(column, value)?;
                match parse_hyphenated_uuid(text) {
                    Ok(uuid) => push_quoted(out, &uuid.hyphenated().to_string()),
                    Err(reason) => {
                        log::warn!("column '{}': '{}' is not a UUID: {}", column.name, text, reason);
                        self.warnings.push(FormatWarning {
                            column: column.name.clone(),
                            code: ErrorCode::UuidParseFailure,
                            message: format!("'{}' is not a UUID", text),
                        });
                        push_quoted(out, UNKNOWN_UUID_TEXT);
                    }
                }
            }
        }
        Ok(())
    }

    fn format_millis(&self, column: &ColumnDescriptor, millis: i64) -> FormatResult<String> {
        match millis {
            EPOCH_START_SENTINEL_MILLIS => Ok(EPOCH_START_SENTINEL_TEXT.to_string()),
            PARSE_ERROR_SENTINEL_MILLIS => Ok(PARSE_ERROR_SENTINEL_TEXT.to_string()),
            _ => self
                .zone
                .at_millis(millis)
                .map(|dt| dt.format(DATE_TIME_FORMAT).to_string())
                .ok_or_else(|| FormatError::TimestampOutOfRange {
                    column: column.name.clone(),
                    millis,
                }),
        }
    }
}

fn format_primitive(
    column: &ColumnDescriptor,
    kind: PrimitiveKind,
    value: &RowValue,
    out: &mut String,
) -> FormatResult<()> {
    match (kind, value) {
        (PrimitiveKind::String | PrimitiveKind::Enum, _) => push_quoted(out, text_of(column, value)?),
        (PrimitiveKind::Int32, RowValue::Int(v)) => out.push_str(&v.to_string()),
        (PrimitiveKind::Int64, RowValue::Long(v)) => out.push_str(&v.to_string()),
        (PrimitiveKind::Int64, RowValue::Int(v)) => out.push_str(&v.to_string()),
        (PrimitiveKind::Float32, RowValue::Float(v)) => out.push_str(&f32_to_string(*v)),
        (PrimitiveKind::Float64, RowValue::Double(v)) => out.push_str(&f64_to_string(*v)),
        (PrimitiveKind::Float64, RowValue::Float(v)) => out.push_str(&f32_to_string(*v)),
        (PrimitiveKind::Boolean, RowValue::Boolean(v)) => out.push_str(if *v { "true" } else { "false" }),
        (kind, other) => return Err(mismatch(column, kind.type_name(), other)),
    }
    Ok(())
}

/// Text of a string-backed value; UTF-8 bytes are accepted
fn text_of<'v>(column: &ColumnDescriptor, value: &'v RowValue) -> FormatResult<&'v str> {
    match value {
        RowValue::String(s) => Ok(s),
        RowValue::Bytes(bytes) => {
            std::str::from_utf8(bytes).map_err(|_| mismatch(column, "string", value))
        }
        other => Err(mismatch(column, "string", other)),
    }
}

fn mismatch(column: &ColumnDescriptor, expected: &'static str, found: &RowValue) -> FormatError {
    FormatError::ValueEncodingMismatch {
        column: column.name.clone(),
        expected,
        found: found.kind_name(),
    }
}

fn push_quoted(out: &mut String, text: &str) {
    out.push('\'');
    out.push_str(text);
    out.push('\'');
}

/// Accepts only the 36-character `8-4-4-4-12` form; the simple, braced and
/// URN forms are parse failures.
fn parse_hyphenated_uuid(text: &str) -> Result<Uuid, String> {
    if text.len() != HYPHENATED_UUID_LEN {
        return Err(format!(
            "expected {} characters, found {}",
            HYPHENATED_UUID_LEN,
            text.len()
        ));
    }
    Uuid::parse_str(text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, EnumType};

    fn utc_formatter() -> ValueFormatter {
        ValueFormatter::new(TimeZoneSetting::utc())
    }

    fn logical(name: &str, logical: LogicalType) -> ColumnDescriptor {
        ColumnDescriptor::new(name, ColumnType::Logical(logical))
    }

    #[test]
    fn test_null_is_unquoted() {
        let mut f = utc_formatter();
        let col = ColumnDescriptor::nullable("name", ColumnType::String);
        assert_eq!(f.format(&col, &RowValue::Null).unwrap(), "null");
    }

    #[test]
    fn test_decimal_scale_two() {
        let mut f = utc_formatter();
        let col = logical("amount", LogicalType::Decimal { precision: 10, scale: 2 });
        assert_eq!(f.format(&col, &RowValue::Bytes(vec![0x30, 0x39])).unwrap(), "123.45");
    }

    #[test]
    fn test_sentinels_ignore_zone() {
        for zone in ["+05:30", "-08:00", "Z"] {
            let mut f = ValueFormatter::new(TimeZoneSetting::parse(zone).unwrap());
            let col = logical("when", LogicalType::TimestampMillis);
            assert_eq!(
                f.format(&col, &RowValue::Long(EPOCH_START_SENTINEL_MILLIS)).unwrap(),
                "'1900-01-01T00:00:00.000-00:00'"
            );
            assert_eq!(
                f.format(&col, &RowValue::Long(PARSE_ERROR_SENTINEL_MILLIS)).unwrap(),
                "'1900-01-02T00:00:00.000-00:00'"
            );
        }
    }

    #[test]
    fn test_timestamp_in_fixed_zone() {
        let mut f = ValueFormatter::new(TimeZoneSetting::parse("+01:00").unwrap());
        let col = logical("when", LogicalType::TimestampMillis);
        // 2024-01-31T07:00:00.123Z
        assert_eq!(
            f.format(&col, &RowValue::Long(1_706_684_400_123)).unwrap(),
            "'2024-01-31T08:00:00.123+01:00'"
        );
        let date = logical("day", LogicalType::Date);
        assert_eq!(
            utc_formatter().format(&date, &RowValue::Long(0)).unwrap(),
            "'1970-01-01T00:00:00.000+00:00'"
        );
    }

    #[test]
    fn test_invalid_uuid_warns() {
        let mut f = utc_formatter();
        let col = logical("id", LogicalType::Uuid);
        assert_eq!(f.format(&col, &RowValue::from("not-a-uuid")).unwrap(), "'unknown'");
        assert_eq!(f.warnings().len(), 1);
        assert_eq!(f.warnings()[0].code, ErrorCode::UuidParseFailure);
        assert_eq!(f.take_warnings().len(), 1);
        assert!(f.warnings().is_empty());
    }

    #[test]
    fn test_non_hyphenated_uuid_forms_warn() {
        let mut f = utc_formatter();
        let col = logical("id", LogicalType::Uuid);
        for text in [
            "3f2504e04f8911d39a0c0305e82c3301",
            "urn:uuid:3f2504e0-4f89-11d3-9a0c-0305e82c3301",
            "{3f2504e0-4f89-11d3-9a0c-0305e82c3301}",
        ] {
            assert_eq!(f.format(&col, &RowValue::from(text)).unwrap(), "'unknown'", "{}", text);
        }
        let warnings = f.take_warnings();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().all(|w| w.code == ErrorCode::UuidParseFailure));
    }

    #[test]
    fn test_valid_uuid_is_normalized() {
        let mut f = utc_formatter();
        let col = logical("id", LogicalType::Uuid);
        assert_eq!(
            f.format(&col, &RowValue::from("3F2504E0-4F89-11D3-9A0C-0305E82C3301")).unwrap(),
            "'3f2504e0-4f89-11d3-9a0c-0305e82c3301'"
        );
        assert!(f.warnings().is_empty());
    }

    #[test]
    fn test_primitives() {
        let mut f = utc_formatter();
        let cases = [
            (ColumnType::String, RowValue::from("Widget"), "'Widget'"),
            (
                ColumnType::Enum(EnumType::new("Op", vec!["INSERT".into()])),
                RowValue::from("INSERT"),
                "'INSERT'",
            ),
            (ColumnType::Int32, RowValue::Int(-7), "-7"),
            (ColumnType::Int64, RowValue::Long(9_007_199_254_740_993), "9007199254740993"),
            (ColumnType::Float64, RowValue::Double(2.5), "2.5"),
            (ColumnType::Float32, RowValue::Float(0.1), "0.100000001490116119384765625"),
            (ColumnType::Boolean, RowValue::Boolean(true), "true"),
        ];
        for (column_type, value, expected) in cases {
            let col = ColumnDescriptor::new("c", column_type);
            assert_eq!(f.format(&col, &value).unwrap(), expected);
        }
    }

    #[test]
    fn test_union_uses_effective_type() {
        let mut f = utc_formatter();
        let col = ColumnDescriptor::union(
            "when",
            vec![
                ColumnType::Null,
                ColumnType::Int64,
                ColumnType::Logical(LogicalType::TimestampMillis),
            ],
        );
        assert_eq!(
            f.format(&col, &RowValue::Long(EPOCH_START_SENTINEL_MILLIS)).unwrap(),
            "'1900-01-01T00:00:00.000-00:00'"
        );
    }

    #[test]
    fn test_backing_mismatch_is_an_error() {
        let mut f = utc_formatter();
        let col = logical("amount", LogicalType::Decimal { precision: 5, scale: 1 });
        let err = f.format(&col, &RowValue::Long(5)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValueEncodingMismatch);

        let col = ColumnDescriptor::new("n", ColumnType::Int32);
        assert!(f.format(&col, &RowValue::from("5")).is_err());
    }

    #[test]
    fn test_nested_value_is_rejected() {
        let mut f = utc_formatter();
        let col = ColumnDescriptor::new("tags", ColumnType::String);
        let err = f.format(&col, &RowValue::Nested("list")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedFieldShape);
    }

    #[test]
    fn test_format_row() {
        let mut f = utc_formatter();
        let columns = [
            ColumnDescriptor::new("name", ColumnType::String),
            ColumnDescriptor::nullable("qty", ColumnType::Int32),
        ];
        let mut out = String::new();
        f.format_row(&columns, &[RowValue::from("a"), RowValue::Null], &mut out).unwrap();
        assert_eq!(out, "'a',null");
    }
}
