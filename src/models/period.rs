//! Reporting periods
//!
//! [`DateWindow`] is the exclusive date range every aggregation runs over.
//! [`Month`] is a calendar month, used as the bucket key for monthly bar
//! series and as a shorthand for selecting a window on the command line.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A date range whose bounds are both excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub stop: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, stop: NaiveDate) -> Self {
        Self { start, stop }
    }

    /// Window covering the `days` days before `stop`
    ///
    /// The start is clamped to the earliest representable date.
    pub fn lookback(stop: NaiveDate, days: u64) -> Self {
        Self {
            start: stop.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN),
            stop,
        }
    }

    /// Check if a date lies strictly between the bounds
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start < date && date < self.stop
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.stop.format("%Y-%m-%d")
        )
    }
}

/// A calendar month (e.g., "2025-01")
///
/// Every `Month` has a representable first day; [`Month::new`] and
/// [`Month::parse`] also guarantee that [`Month::window`] exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::InvalidMonth(month));
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(PeriodParseError::OutOfRange(year))?;
        let result = Self { first };
        if result.window().is_none() {
            return Err(PeriodParseError::OutOfRange(year));
        }
        Ok(result)
    }

    /// The month a date falls into
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1-12
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// The following month; `None` past the last representable date
    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// The exclusive window that contains every day of this month
    pub fn window(&self) -> Option<DateWindow> {
        Some(DateWindow {
            start: self.first.pred_opt()?,
            stop: self.next()?.first,
        })
    }

    /// Parse a month string in "YYYY-MM" format
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodParseError::InvalidFormat(s.to_string()))?;

        let year: i32 = year
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for Month {
    type Error = PeriodParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
    OutOfRange(i32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => write!(f, "Invalid period format: {}", s),
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
            PeriodParseError::OutOfRange(y) => write!(f, "Year {} is out of range", y),
        }
    }
}

impl std::error::Error for PeriodParseError {}
