//! Time zone used to render temporal columns
//!
//! Accepted offsets: `Z`, `+h`, `+hh`, `+hh:mm` and `+hhmm` (either sign),
//! bounded to +/-18 hours. Without an offset the system local zone applies.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

use super::errors::{FormatError, FormatResult};

const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

/// Zone for converting epoch milliseconds to an offset date-time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeZoneSetting {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl TimeZoneSetting {
    /// Parses an offset such as `+05:30`
    pub fn parse(text: &str) -> FormatResult<Self> {
        let invalid = || FormatError::InvalidTimeZone(text.to_string());
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("z") {
            return Ok(Self::utc());
        }

        let (sign, rest) = match trimmed.as_bytes().first() {
            Some(b'+') => (1, &trimmed[1..]),
            Some(b'-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
            return Err(invalid());
        }

        let (hours, minutes) = match (rest.len(), rest.find(':')) {
            (1 | 2, None) => (rest, "0"),
            (4, None) => rest.split_at(2),
            (5, Some(2)) => (&rest[..2], &rest[3..]),
            _ => return Err(invalid()),
        };
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }

        let seconds = sign * (hours * 3600 + minutes * 60);
        if seconds.abs() > MAX_OFFSET_SECONDS {
            return Err(invalid());
        }
        FixedOffset::east_opt(seconds)
            .map(TimeZoneSetting::Fixed)
            .ok_or_else(invalid)
    }

    pub fn utc() -> Self {
        TimeZoneSetting::Fixed(Utc.fix())
    }

    /// Converts epoch milliseconds to a date-time in this zone
    pub fn at_millis(&self, millis: i64) -> Option<DateTime<FixedOffset>> {
        let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(match self {
            TimeZoneSetting::Local => utc.with_timezone(&Local).fixed_offset(),
            TimeZoneSetting::Fixed(offset) => utc.with_timezone(offset),
        })
    }
}

impl FromStr for TimeZoneSetting {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Local => write!(f, "local"),
            TimeZoneSetting::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}
