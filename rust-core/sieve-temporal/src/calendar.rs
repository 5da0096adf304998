// SPDX-License-Identifier: PMPL-1.0-or-later
//! Proleptic Gregorian calendar arithmetic and ISO week dates.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Component, TemporalError};

/// A validated calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    /// Build a date, checking month and day against the calendar.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, TemporalError> {
        if !(1..=12).contains(&month) {
            return Err(TemporalError::invalid(
                Component::Month,
                month,
                "must be between 1 and 12",
            ));
        }
        let last = days_in_month(year, month);
        if !(1..=last).contains(&day) {
            return Err(TemporalError::invalid(
                Component::Day,
                day,
                format!("must be between 1 and {last} for {year:04}-{month:02}"),
            ));
        }
        Ok(Self { year, month, day })
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// `None` only outside chrono's supported year range.
    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// ISO `(year, week, weekday)` for this date, weekday 1 = Monday.
    pub fn iso_week_date(self) -> Option<(i32, u32, u32)> {
        let date = self.to_naive()?;
        let week = date.iso_week();
        Some((
            week.year(),
            week.week(),
            date.weekday().number_from_monday(),
        ))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}-{:02}-{:02}", -self.year, self.month, self.day)
        } else {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
        }
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`, or 0 when the month is out of range.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Number of ISO weeks in `year`: the week number of December 28th.
pub fn weeks_in_iso_year(year: i32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, 12, 28).map(|d| d.iso_week().week())
}

/// Convert an ISO week date to a calendar date.
///
/// January 4th is always in week 1, so the Monday of week 1 is found by
/// stepping back from it, then `week - 1` weeks and `weekday - 1` days are
/// added.
pub fn week_date_to_calendar(
    year: i32,
    week: u32,
    weekday: u32,
) -> Result<CalendarDate, TemporalError> {
    let out_of_range = || {
        TemporalError::invalid(Component::Year, year, "outside the supported calendar range")
    };

    let weeks = weeks_in_iso_year(year).ok_or_else(out_of_range)?;
    if !(1..=weeks).contains(&week) {
        return Err(TemporalError::invalid(
            Component::Week,
            week,
            format!("must be between 1 and {weeks} for ISO year {year:04}"),
        ));
    }
    if !(1..=7).contains(&weekday) {
        return Err(TemporalError::invalid(
            Component::Weekday,
            weekday,
            "must be between 1 (Monday) and 7 (Sunday)",
        ));
    }

    let jan4 = NaiveDate::from_ymd_opt(year, 1, 4).ok_or_else(out_of_range)?;
    let monday = jan4 - Duration::days(i64::from(jan4.weekday().num_days_from_monday()));
    let date = monday
        + Duration::weeks(i64::from(week - 1))
        + Duration::days(i64::from(weekday - 1));

    Ok(CalendarDate::from_naive(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2016));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2001));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2001, 2), 28);
        assert_eq!(days_in_month(2017, 4), 30);
        assert_eq!(days_in_month(2017, 12), 31);
        assert_eq!(days_in_month(2017, 13), 0);
    }

    #[test]
    fn test_weeks_in_iso_year() {
        assert_eq!(weeks_in_iso_year(2015), Some(53));
        assert_eq!(weeks_in_iso_year(2017), Some(52));
        assert_eq!(weeks_in_iso_year(2020), Some(53));
    }

    #[test]
    fn test_week_date_conversion() {
        // 2017-W12-1 is Monday 20 March 2017
        let date = week_date_to_calendar(2017, 12, 1).unwrap();
        assert_eq!(date, CalendarDate { year: 2017, month: 3, day: 20 });

        // Week 1 of 2015 starts in the previous calendar year
        let date = week_date_to_calendar(2015, 1, 1).unwrap();
        assert_eq!(date, CalendarDate { year: 2014, month: 12, day: 29 });
    }

    #[test]
    fn test_week_out_of_range() {
        let err = week_date_to_calendar(2017, 53, 1).unwrap_err();
        assert_eq!(err.component(), Some(Component::Week));

        let err = week_date_to_calendar(2017, 0, 1).unwrap_err();
        assert_eq!(err.component(), Some(Component::Week));

        let err = week_date_to_calendar(2017, 10, 8).unwrap_err();
        assert_eq!(err.component(), Some(Component::Weekday));
    }

    #[test]
    fn test_calendar_date_validation() {
        assert!(CalendarDate::new(2000, 2, 29).is_ok());
        assert_eq!(
            CalendarDate::new(2000, 2, 30).unwrap_err().component(),
            Some(Component::Day)
        );
        assert_eq!(
            CalendarDate::new(2000, 13, 1).unwrap_err().component(),
            Some(Component::Month)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CalendarDate { year: 17, month: 1, day: 2 }.to_string(), "0017-01-02");
        assert_eq!(CalendarDate { year: -44, month: 3, day: 15 }.to_string(), "-0044-03-15");
    }
}
