//! Month-year calendar values
//!
//! A `MonthYear` is a calendar point with month and year only. Its textual
//! form is strictly `MM-YYYY`: two digits for the month, a dash, four digits
//! for the year, nothing before or after.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest year representable in four digits
const MAX_YEAR: u16 = 9999;

/// Error returned when text is not a `MM-YYYY` value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected MM-YYYY, got {0:?}")]
pub struct ParseMonthYearError(String);

/// A calendar month of a given year
///
/// Ordering is chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    year: u16,
    month: u8,
}

impl MonthYear {
    /// Build a value from a month (`1..=12`) and a year (`0..=9999`)
    pub fn new(month: u8, year: u16) -> Option<Self> {
        if (1..=12).contains(&month) && year <= MAX_YEAR {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Month of the year, `1..=12`
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Four-digit year
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Months elapsed since January of year zero
    ///
    /// Consecutive months differ by exactly one, so the number of whole
    /// months in an inclusive range is `b.ordinal() - a.ordinal() + 1`.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Inverse of [`MonthYear::ordinal`]
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        if ordinal < 0 {
            return None;
        }
        let year = u16::try_from(ordinal / 12).ok()?;
        let month = u8::try_from(ordinal % 12 + 1).ok()?;
        Self::new(month, year)
    }
}

impl FromStr for MonthYear {
    type Err = ParseMonthYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthYearError(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[2] != b'-' {
            return Err(err());
        }

        let (month, year) = (&s[..2], &s[3..]);
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let month: u8 = month.parse().map_err(|_| err())?;
        let year: u16 = year.parse().map_err(|_| err())?;
        Self::new(month, year).ok_or_else(err)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
