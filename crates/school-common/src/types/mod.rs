//! Common types used across the school server

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchoolError};

/// Date format used on the wire and in query strings
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive range of calendar dates
///
/// Used by attendance reports and summaries. The end date is never before
/// the start date.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use school_common::types::DateRange;
///
/// let range = DateRange::month_of(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
/// assert_eq!(range.days(), 29);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting an end date before the start date
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(SchoolError::InvalidRange {
                start: start.format(DATE_FORMAT).to_string(),
                end: end.format(DATE_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };
        let end = next_month
            .and_then(|d| d.pred_opt())
            .unwrap_or(start);
        Self { start, end }
    }

    /// Build a range from optional query-string values
    ///
    /// Missing bounds default to the month containing `today`: a missing start
    /// becomes the first day of that month and a missing end the last day.
    pub fn from_query(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<Self> {
        let month = Self::month_of(today);
        let start = match start {
            Some(s) => parse_date(s)?,
            None => month.start,
        };
        let end = match end {
            Some(s) => parse_date(s)?,
            None => month.end,
        };
        Self::new(start, end)
    }

    /// Number of calendar days in the range, inclusive
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Reject ranges longer than `max_days`
    pub fn ensure_max_days(&self, max_days: i64) -> Result<()> {
        let days = self.days();
        if days > max_days {
            return Err(SchoolError::RangeTooLong { days, max_days });
        }
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| SchoolError::InvalidDate(value.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_reversed_range() {
        let err = DateRange::new(date(2024, 9, 10), date(2024, 9, 1)).unwrap_err();
        assert!(matches!(err, SchoolError::InvalidRange { .. }));
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(date(2024, 9, 2), date(2024, 9, 2)).unwrap();
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn test_month_of_handles_december_and_leap_years() {
        let dec = DateRange::month_of(date(2024, 12, 25));
        assert_eq!(dec.start, date(2024, 12, 1));
        assert_eq!(dec.end, date(2024, 12, 31));

        let feb = DateRange::month_of(date(2023, 2, 3));
        assert_eq!(feb.end, date(2023, 2, 28));
    }

    #[test]
    fn test_from_query_defaults_to_current_month() {
        let range = DateRange::from_query(None, None, date(2024, 4, 17)).unwrap();
        assert_eq!(range.start, date(2024, 4, 1));
        assert_eq!(range.end, date(2024, 4, 30));

        let range = DateRange::from_query(Some("2024-04-10"), None, date(2024, 4, 17)).unwrap();
        assert_eq!(range.start, date(2024, 4, 10));
        assert_eq!(range.end, date(2024, 4, 30));
    }

    #[test]
    fn test_from_query_rejects_bad_dates() {
        let err = DateRange::from_query(Some("10/04/2024"), None, date(2024, 4, 17)).unwrap_err();
        assert!(matches!(err, SchoolError::InvalidDate(_)));
    }

    #[test]
    fn test_ensure_max_days() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(range.days(), 366);
        assert!(range.ensure_max_days(366).is_ok());
        assert!(range.ensure_max_days(365).is_err());
    }
}
