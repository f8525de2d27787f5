//! BSON `DateTime` (`0x09`): a signed 64-bit count of milliseconds since the
//! Unix epoch.

use std::fmt;

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::error::{Error, ErrorKind, Result};

/// A BSON UTC datetime, stored as milliseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    millis: i64,
}

impl DateTime {
    /// Constructs a `DateTime` from milliseconds since the Unix epoch.
    pub const fn from_millis(millis: i64) -> Self {
        DateTime { millis }
    }

    /// The current time.
    pub fn now() -> Self {
        let now = OffsetDateTime::now_utc();
        DateTime::from_millis(now.unix_timestamp() * 1000 + now.millisecond() as i64)
    }

    /// Milliseconds since the Unix epoch.
    pub const fn millis(&self) -> i64 {
        self.millis
    }

    /// Converts to a [`time::OffsetDateTime`], failing if the millisecond
    /// count is out of the range representable by that type.
    pub fn to_offset_date_time(self) -> Result<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp_nanos(self.millis as i128 * 1_000_000)
            .map_err(|e| Error::new(ErrorKind::DateTime {}).with_message(e.to_string()))
    }

    /// Constructs a `DateTime` from a [`time::OffsetDateTime`], truncating to
    /// millisecond precision.
    pub fn from_offset_date_time(dt: OffsetDateTime) -> Self {
        DateTime::from_millis(dt.unix_timestamp() * 1000 + dt.millisecond() as i64)
    }

    /// Formats this datetime using RFC 3339, the way the pretty-printer
    /// renders `ISODate(...)` notation.
    pub fn to_rfc3339(self) -> Result<String> {
        self.to_offset_date_time()?
            .format(&Rfc3339)
            .map_err(|e| Error::new(ErrorKind::DateTime {}).with_message(e.to_string()))
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Ok(s) => write!(f, "DateTime({s})"),
            Err(_) => write!(f, "DateTime({} ms)", self.millis),
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Ok(s) => write!(f, "ISODate('{s}')"),
            Err(_) => write!(f, "ISODate('{} ms')", self.millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_round_trip() {
        let dt = DateTime::from_millis(1_700_000_000_123);
        assert_eq!(dt.millis(), 1_700_000_000_123);
    }

    #[test]
    fn offset_date_time_round_trips_to_millis() {
        let dt = DateTime::from_millis(1_700_000_000_123);
        let odt = dt.to_offset_date_time().unwrap();
        assert_eq!(DateTime::from_offset_date_time(odt), dt);
    }
}
