//! Value formatting
//!
//! Turns untyped row values into the text of the comma-separated export,
//! guided by each column's effective type.

mod decimal;
mod errors;
mod formatter;
mod timezone;
mod value;

pub use decimal::{decimal_to_string, f32_to_string, f64_to_string};
pub use errors::{FormatError, FormatResult, FormatWarning};
pub use formatter::{
    ValueFormatter, EPOCH_START_SENTINEL_MILLIS, EPOCH_START_SENTINEL_TEXT,
    PARSE_ERROR_SENTINEL_MILLIS, PARSE_ERROR_SENTINEL_TEXT,
};
pub use timezone::TimeZoneSetting;
pub use value::RowValue;
