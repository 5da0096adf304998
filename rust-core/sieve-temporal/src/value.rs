// SPDX-License-Identifier: PMPL-1.0-or-later
//! Semantic values produced by the grammar.

use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::CalendarDate;
use crate::{Component, TemporalError};

/// How much of a date literal was actually written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePrecision {
    /// `YYYY`
    Year,
    /// `YYYY-MM`
    Month,
    /// `YYYY-MM-DD`
    Day,
    /// `YYYY-Www`
    Week,
    /// `YYYY-Www-D`
    WeekDay,
}

/// A parsed date literal. Omitted components fall back to the first month,
/// day or weekday of the written period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IsoDate {
    pub date: CalendarDate,
    pub precision: DatePrecision,
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.date.fmt(f)
    }
}

/// Time of day with microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub micros: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay {
        hour: 0,
        minute: 0,
        second: 0,
        micros: 0,
    };

    pub fn new(hour: u32, minute: u32, second: u32, micros: u32) -> Result<Self, TemporalError> {
        if hour > 23 {
            return Err(TemporalError::invalid(Component::Hour, hour, "must be between 0 and 23"));
        }
        if minute > 59 {
            return Err(TemporalError::invalid(
                Component::Minute,
                minute,
                "must be between 0 and 59",
            ));
        }
        if second > 59 {
            return Err(TemporalError::invalid(
                Component::Second,
                second,
                "must be between 0 and 59",
            ));
        }
        if micros > 999_999 {
            return Err(TemporalError::invalid(Component::Fraction, micros, "at most six digits"));
        }
        Ok(Self {
            hour,
            minute,
            second,
            micros,
        })
    }

    pub fn to_naive(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_micro_opt(self.hour, self.minute, self.second, self.micros)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.micros > 0 {
            write!(f, ".{:06}", self.micros)?;
        }
        Ok(())
    }
}

/// A fixed offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtcOffset {
    pub negative: bool,
    pub hours: u32,
    pub minutes: u32,
}

impl UtcOffset {
    pub const UTC: UtcOffset = UtcOffset {
        negative: false,
        hours: 0,
        minutes: 0,
    };

    pub fn new(negative: bool, hours: u32, minutes: u32) -> Result<Self, TemporalError> {
        if hours > 23 {
            return Err(TemporalError::invalid(
                Component::OffsetHours,
                hours,
                "must be between 0 and 23",
            ));
        }
        if minutes > 59 {
            return Err(TemporalError::invalid(
                Component::OffsetMinutes,
                minutes,
                "must be between 0 and 59",
            ));
        }
        Ok(Self {
            negative,
            hours,
            minutes,
        })
    }

    /// Signed offset in seconds east of UTC.
    pub fn total_seconds(self) -> i32 {
        // Bounded by 23:59, so the cast cannot overflow.
        let magnitude = (self.hours * 3600 + self.minutes * 60) as i32;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn to_fixed_offset(self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.total_seconds())
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative && (self.hours, self.minutes) != (0, 0) {
            '-'
        } else {
            '+'
        };
        write!(f, "{sign}{:02}:{:02}", self.hours, self.minutes)
    }
}

/// A parsed datetime literal. A bare date parses as midnight with no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IsoDateTime {
    pub date: CalendarDate,
    pub time: TimeOfDay,
    pub offset: Option<UtcOffset>,
}

impl IsoDateTime {
    pub fn to_naive(self) -> Option<NaiveDateTime> {
        Some(self.date.to_naive()?.and_time(self.time.to_naive()?))
    }

    /// Resolve to an instant, using `assumed` when the literal carried no offset.
    pub fn to_datetime(self, assumed: UtcOffset) -> Option<DateTime<FixedOffset>> {
        let offset = self.offset.unwrap_or(assumed).to_fixed_offset()?;
        offset.from_local_datetime(&self.to_naive()?).single()
    }
}

impl fmt::Display for IsoDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)?;
        if let Some(offset) = self.offset {
            write!(f, "{offset}")?;
        }
        Ok(())
    }
}

/// A signed ISO8601 duration. Every component is independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IsoDuration {
    pub years: Option<i64>,
    pub months: Option<i64>,
    pub weeks: Option<i64>,
    pub days: Option<i64>,
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
}

impl IsoDuration {
    /// True for the bare `P` literal.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Calendar part in whole months.
    pub fn total_months(&self) -> Option<i64> {
        self.years
            .unwrap_or(0)
            .checked_mul(12)?
            .checked_add(self.months.unwrap_or(0))
    }

    /// Exact part (weeks and below) in seconds.
    pub fn total_seconds(&self) -> Option<i64> {
        let parts = [
            (self.weeks, 7 * 86_400),
            (self.days, 86_400),
            (self.hours, 3_600),
            (self.minutes, 60),
            (self.seconds, 1),
        ];
        parts.iter().try_fold(0i64, |acc, (value, unit)| {
            acc.checked_add(value.unwrap_or(0).checked_mul(*unit)?)
        })
    }

    /// Shift `instant` by this duration: months first, then the exact part.
    /// `None` when the result leaves chrono's range.
    pub fn apply_to(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months = self.total_months()?;
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        let shifted = if months >= 0 {
            instant.checked_add_months(magnitude)?
        } else {
            instant.checked_sub_months(magnitude)?
        };
        shifted.checked_add_signed(Duration::try_seconds(self.total_seconds()?)?)
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("P")?;
        let date_parts = [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ];
        for (value, unit) in date_parts {
            if let Some(v) = value {
                write!(f, "{v}{unit}")?;
            }
        }
        if self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some() {
            f.write_str("T")?;
            for (value, unit) in [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')] {
                if let Some(v) = value {
                    write!(f, "{v}{unit}")?;
                }
            }
        }
        Ok(())
    }
}
