// SPDX-License-Identifier: PMPL-1.0-or-later
//! Literal grammars.
//!
//! Accepted forms:
//!
//! | Grammar  | Form |
//! |----------|------|
//! | Date     | `[±]YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYY[-]Www`, `YYYY[-]Www[-]D` |
//! | Time     | `HH[:MM[:SS[.f]]]`, up to six fraction digits |
//! | DateTime | full date `T` time, then `Z` or `±HH[[:]MM]` |
//! | Duration | `P[nY][nM][nW][nD][T[nH][nM][nS]]`, each `n` signed |
//!
//! `YYYYMMDD` and `YYYY-MMDD` are rejected: a calendar month or day always
//! needs its dash.

use regex::{Captures, Regex};
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::trace;

use crate::calendar::{week_date_to_calendar, CalendarDate};
use crate::value::{DatePrecision, IsoDate, IsoDateTime, IsoDuration, TimeOfDay, UtcOffset};
use crate::{Component, Grammar, TemporalError};

const DATE_BODY: &str = r"(?P<year>[+-]?[0-9]{4})(?:-(?P<month>[0-9]{2})(?:-(?P<day>[0-9]{2}))?|-?W(?P<week>[0-9]{2})(?:-?(?P<weekday>[0-9]))?)?";

// Before a time only complete dates are allowed.
const FULL_DATE_BODY: &str = r"(?P<year>[+-]?[0-9]{4})(?:-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})|-?W(?P<week>[0-9]{2})-?(?P<weekday>[0-9]))";

const TIME_BODY: &str = r"(?P<hour>[0-9]{2})(?::(?P<minute>[0-9]{2})(?::(?P<second>[0-9]{2})(?:\.(?P<fraction>[0-9]{1,6}))?)?)?";

// U+2212 MINUS SIGN is accepted as an alias for '-'.
const OFFSET_BODY: &str = r"(?P<utc>[Zz])|(?P<sign>[+\-\x{2212}])(?P<offset_hours>[0-9]{2})(?::?(?P<offset_minutes>[0-9]{2}))?";

const DURATION_PATTERN: &str = r"^P(?:(?P<years>[+-]?[0-9]+)Y)?(?:(?P<months>[+-]?[0-9]+)M)?(?:(?P<weeks>[+-]?[0-9]+)W)?(?:(?P<days>[+-]?[0-9]+)D)?(?:T(?:(?P<hours>[+-]?[0-9]+)H)?(?:(?P<minutes>[+-]?[0-9]+)M)?(?:(?P<seconds>[+-]?[0-9]+)S)?)?$";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in temporal pattern must compile")
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(&format!("^{DATE_BODY}$")))
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(&format!("^{TIME_BODY}$")))
}

fn datetime_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(&format!("^{FULL_DATE_BODY}[Tt]{TIME_BODY}(?:{OFFSET_BODY})?$")))
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(DURATION_PATTERN))
}

fn captures<'i>(
    re: &Regex,
    grammar: Grammar,
    input: &'i str,
) -> Result<Captures<'i>, TemporalError> {
    re.captures(input).ok_or_else(|| {
        trace!(%grammar, input, "literal rejected by grammar");
        TemporalError::malformed(grammar, input)
    })
}

/// Numeric value of an optional named group.
fn number<T: FromStr>(
    caps: &Captures<'_>,
    name: &str,
    component: Component,
) -> Result<Option<T>, TemporalError> {
    caps.name(name)
        .map(|m| {
            m.as_str()
                .parse::<T>()
                .map_err(|_| {
                    TemporalError::invalid(component, m.as_str(), "does not fit in an integer")
                })
        })
        .transpose()
}

fn date_from(caps: &Captures<'_>) -> Result<IsoDate, TemporalError> {
    let year: i32 = number(caps, "year", Component::Year)?.unwrap_or_default();

    if let Some(week) = number::<u32>(caps, "week", Component::Week)? {
        let weekday = number::<u32>(caps, "weekday", Component::Weekday)?;
        let date = week_date_to_calendar(year, week, weekday.unwrap_or(1))?;
        let precision = if weekday.is_some() {
            DatePrecision::WeekDay
        } else {
            DatePrecision::Week
        };
        return Ok(IsoDate { date, precision });
    }

    let month = number::<u32>(caps, "month", Component::Month)?;
    let day = number::<u32>(caps, "day", Component::Day)?;
    let precision = match (month, day) {
        (None, _) => DatePrecision::Year,
        (Some(_), None) => DatePrecision::Month,
        (Some(_), Some(_)) => DatePrecision::Day,
    };
    let date = CalendarDate::new(year, month.unwrap_or(1), day.unwrap_or(1))?;
    Ok(IsoDate { date, precision })
}

fn time_from(caps: &Captures<'_>) -> Result<TimeOfDay, TemporalError> {
    let hour = number(caps, "hour", Component::Hour)?.unwrap_or_default();
    let minute = number(caps, "minute", Component::Minute)?.unwrap_or_default();
    let second = number(caps, "second", Component::Second)?.unwrap_or_default();
    // Right-pad to microseconds: ".5" is 500000us, not 5us.
    let micros = match caps.name("fraction") {
        Some(m) => format!("{:0<6}", m.as_str())
            .parse()
            .map_err(|_| {
                TemporalError::invalid(Component::Fraction, m.as_str(), "not a decimal fraction")
            })?,
        None => 0,
    };
    TimeOfDay::new(hour, minute, second, micros)
}

fn offset_from(caps: &Captures<'_>) -> Result<Option<UtcOffset>, TemporalError> {
    if caps.name("utc").is_some() {
        return Ok(Some(UtcOffset::UTC));
    }
    let Some(sign) = caps.name("sign") else {
        return Ok(None);
    };
    let hours = number(caps, "offset_hours", Component::OffsetHours)?.unwrap_or_default();
    let minutes = number(caps, "offset_minutes", Component::OffsetMinutes)?.unwrap_or_default();
    UtcOffset::new(sign.as_str() != "+", hours, minutes).map(Some)
}

/// Parse a date literal (calendar or week form).
pub fn parse_date(input: &str) -> Result<IsoDate, TemporalError> {
    let caps = captures(date_re(), Grammar::Date, input)?;
    date_from(&caps)
}

/// Parse a time-of-day literal.
pub fn parse_time(input: &str) -> Result<TimeOfDay, TemporalError> {
    let caps = captures(time_re(), Grammar::Time, input)?;
    time_from(&caps)
}

/// Parse a datetime literal.
///
/// Input without a `T` separator is parsed as a date at midnight with no
/// offset.
pub fn parse_datetime(input: &str) -> Result<IsoDateTime, TemporalError> {
    if !input.contains(['T', 't']) {
        let date = parse_date(input)?;
        return Ok(IsoDateTime {
            date: date.date,
            time: TimeOfDay::MIDNIGHT,
            offset: None,
        });
    }

    let caps = captures(datetime_re(), Grammar::DateTime, input)?;
    Ok(IsoDateTime {
        date: date_from(&caps)?.date,
        time: time_from(&caps)?,
        offset: offset_from(&caps)?,
    })
}

/// Parse a duration literal. Components only need to fit in an `i64`.
pub fn parse_duration(input: &str) -> Result<IsoDuration, TemporalError> {
    let caps = captures(duration_re(), Grammar::Duration, input)?;
    Ok(IsoDuration {
        years: number(&caps, "years", Component::Years)?,
        months: number(&caps, "months", Component::Months)?,
        weeks: number(&caps, "weeks", Component::Weeks)?,
        days: number(&caps, "days", Component::Days)?,
        hours: number(&caps, "hours", Component::Hours)?,
        minutes: number(&caps, "minutes", Component::Minutes)?,
        seconds: number(&caps, "seconds", Component::Seconds)?,
    })
}

pub fn is_date(input: &str) -> bool {
    parse_date(input).is_ok()
}

pub fn is_time(input: &str) -> bool {
    parse_time(input).is_ok()
}

pub fn is_datetime(input: &str) -> bool {
    parse_datetime(input).is_ok()
}

pub fn is_duration(input: &str) -> bool {
    parse_duration(input).is_ok()
}
