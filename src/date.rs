//! Calendar-date keys and export windows.
//!
//! All ordering decisions in smsexport are made on [`DateKey`], an integer
//! projection of a calendar date (`year * 10000 + month * 100 + day`).
//! Comparing keys instead of raw timestamps makes "on or before a date"
//! independent of the time of day.
//!
//! # Examples
//!
//! ```
//! use smsexport::date::{DateKey, Window};
//!
//! # fn main() -> smsexport::Result<()> {
//! let start = DateKey::parse("2024-01-15")?;
//! assert_eq!(start.value(), 20240115);
//!
//! let window = Window::parse("2024-01-01", "2024-01-31")?;
//! assert!(window.contains(start));
//! # Ok(())
//! # }
//! ```

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Integer-comparable encoding of a calendar date.
///
/// Keys built from real dates are `YYYYMMDD`. Arbitrary integers are also
/// accepted, which keeps the search code testable with small synthetic
/// sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(i32);

impl DateKey {
    /// Wraps a raw key value.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw key value.
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Projects a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.year() * 10000 + date.month() as i32 * 100 + date.day() as i32)
    }

    /// Projects a UTC timestamp onto its calendar date.
    pub fn from_datetime(ts: &DateTime<Utc>) -> Self {
        Self::from_date(ts.date_naive())
    }

    /// Parses a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidDate`] if the format is invalid.
    pub fn parse(input: &str) -> Result<Self, ExportError> {
        NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
            .map(Self::from_date)
            .map_err(|_| ExportError::invalid_date(input))
    }

    /// Converts the key back into a calendar date, if it encodes one.
    pub fn to_date(self) -> Option<NaiveDate> {
        if self.0 <= 0 {
            return None;
        }
        let year = self.0 / 10000;
        let month = (self.0 / 100) % 100;
        let day = self.0 % 100;
        NaiveDate::from_ymd_opt(year, month as u32, day as u32)
    }
}

impl From<i32> for DateKey {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_date() {
            Some(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            None => write!(f, "{}", self.0),
        }
    }
}

impl std::str::FromStr for DateKey {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Anything that can be placed on the date axis.
///
/// The boundary search and range slicing are generic over this trait, so
/// they work on full records as well as on bare keys.
pub trait Dated {
    /// Returns the calendar key this item is ordered by.
    fn date_key(&self) -> DateKey;
}

impl Dated for DateKey {
    fn date_key(&self) -> DateKey {
        *self
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date_key(&self) -> DateKey {
        (**self).date_key()
    }
}

/// Inclusive `[start, end]` range of calendar dates to export.
///
/// The constructor enforces `start <= end`, so every `Window` in the
/// program is well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Window {
    start: DateKey,
    end: DateKey,
}

impl Window {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidWindow`] if `start > end`.
    pub fn new(start: impl Into<DateKey>, end: impl Into<DateKey>) -> Result<Self, ExportError> {
        let start = start.into();
        let end = end.into();
        if start > end {
            return Err(ExportError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a window from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, ExportError> {
        Self::new(DateKey::parse(start)?, DateKey::parse(end)?)
    }

    /// First date included in the window.
    pub fn start(&self) -> DateKey {
        self.start
    }

    /// Last date included in the window.
    pub fn end(&self) -> DateKey {
        self.end
    }

    /// Returns `true` if `key` lies within the window.
    pub fn contains(&self, key: DateKey) -> bool {
        self.start <= key && key <= self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
