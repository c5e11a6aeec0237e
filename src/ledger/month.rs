//! Calendar month keys used to group and filter transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use time::{Date, Duration, Month};

use crate::Error;

/// A (year, month) pair derived from a transaction's date.
///
/// Internally this is the first day of the month, so ordering buckets orders
/// them by the instant the month starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthBucket {
    first_day: Date,
}

impl MonthBucket {
    /// The bucket that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        let days_into_month = i64::from(date.day()) - 1;

        Self {
            first_day: date - Duration::days(days_into_month),
        }
    }

    /// Create the bucket for `month` of `year`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidMonth] if `year` is outside the range supported
    /// by [time::Date].
    pub fn new(year: i32, month: Month) -> Result<Self, Error> {
        Date::from_calendar_date(year, month, 1)
            .map(|first_day| Self { first_day })
            .map_err(|_| Error::InvalidMonth(format!("{year:04}-{:02}", u8::from(month))))
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The month of the year.
    pub fn month(&self) -> Month {
        self.first_day.month()
    }

    /// The first day of the month this bucket represents.
    pub fn first_day(&self) -> Date {
        self.first_day
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: Date) -> bool {
        Self::from_date(date) == *self
    }

    /// The `YYYY-MM` form used in URLs and JSON.
    pub fn as_query_value(&self) -> String {
        format!("{:04}-{:02}", self.year(), u8::from(self.month()))
    }
}

/// Displays the bucket as a heading, e.g. "January 2024".
impl Display for MonthBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

impl FromStr for MonthBucket {
    type Err = Error;

    /// Parse a month in the `YYYY-MM` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;

        if month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_query_value())
    }
}

impl<'de> Deserialize<'de> for MonthBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map_err(de::Error::custom)
    }
}
