//! Calendar month keys (`YYYY-MM`) used to filter transactions by period.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a month key cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid month key '{0}': expected YYYY-MM")]
pub struct MonthKeyError(pub String);

/// A calendar month, serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a month key, returning `None` for an out-of-range month.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Returns the month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses a `YYYY-MM` string.
    pub fn parse(s: &str) -> Result<Self, MonthKeyError> {
        let err = || MonthKeyError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }

    /// The year component.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// The month component (1-12).
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.and_then(|d| d.pred_opt()).unwrap_or(NaiveDate::MAX)
    }

    /// Returns true if `date` falls within this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let key = MonthKey::parse("2025-03").unwrap();
        assert_eq!(key.year(), 2025);
        assert_eq!(key.month(), 3);
        assert_eq!(key.to_string(), "2025-03");
    }

    #[rstest]
    #[case("2025-13")]
    #[case("2025-00")]
    #[case("2025-3")]
    #[case("25-03")]
    #[case("2025/03")]
    #[case("")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(MonthKey::parse(input).is_err());
    }

    #[rstest]
    #[case(2025, 1, 31)]
    #[case(2024, 2, 29)]
    #[case(2025, 2, 28)]
    #[case(2025, 4, 30)]
    #[case(2025, 12, 31)]
    fn test_last_day(#[case] year: i32, #[case] month: u32, #[case] expected_day: u32) {
        let key = MonthKey::new(year, month).unwrap();
        assert_eq!(key.first_day(), date(year, month, 1));
        assert_eq!(key.last_day(), date(year, month, expected_day));
    }

    #[test]
    fn test_contains() {
        let key = MonthKey::parse("2025-02").unwrap();
        assert!(key.contains(date(2025, 2, 1)));
        assert!(key.contains(date(2025, 2, 28)));
        assert!(!key.contains(date(2025, 3, 1)));
        assert!(!key.contains(date(2024, 2, 15)));
    }

    #[test]
    fn test_of_date() {
        assert_eq!(MonthKey::of(date(2025, 7, 19)).to_string(), "2025-07");
    }
}
