// SPDX-License-Identifier: PMPL-1.0-or-later
//! Sieve Temporal Grammar
//!
//! Parses and validates the ISO8601-derived literals accepted by date and
//! time fields: calendar and week dates, times of day, datetimes with an
//! optional UTC offset, and durations.
//!
//! Every literal is matched against the whole input, then checked against the
//! proleptic Gregorian calendar. Syntax failures and out-of-range components
//! are reported as distinct [`TemporalError`] variants.

pub mod calendar;
pub mod grammar;
pub mod value;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use calendar::{
    days_in_month, is_leap_year, week_date_to_calendar, weeks_in_iso_year, CalendarDate,
};
pub use grammar::{
    is_date, is_datetime, is_duration, is_time, parse_date, parse_datetime, parse_duration,
    parse_time,
};
pub use value::{DatePrecision, IsoDate, IsoDateTime, IsoDuration, TimeOfDay, UtcOffset};

/// The literal grammars understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    Date,
    Time,
    DateTime,
    Duration,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::Date => write!(f, "date"),
            Grammar::Time => write!(f, "time"),
            Grammar::DateTime => write!(f, "datetime"),
            Grammar::Duration => write!(f, "duration"),
        }
    }
}

/// A single component of a temporal literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Year,
    Month,
    Day,
    Week,
    Weekday,
    Hour,
    Minute,
    Second,
    Fraction,
    OffsetHours,
    OffsetMinutes,
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Component {
    /// Lowercase name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Component::Year => "year",
            Component::Month => "month",
            Component::Day => "day",
            Component::Week => "week",
            Component::Weekday => "weekday",
            Component::Hour => "hour",
            Component::Minute => "minute",
            Component::Second => "second",
            Component::Fraction => "fraction",
            Component::OffsetHours => "offset hours",
            Component::OffsetMinutes => "offset minutes",
            Component::Years => "years",
            Component::Months => "months",
            Component::Weeks => "weeks",
            Component::Days => "days",
            Component::Hours => "hours",
            Component::Minutes => "minutes",
            Component::Seconds => "seconds",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temporal grammar errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("malformed {grammar} literal: {input:?}")]
    MalformedSyntax { grammar: Grammar, input: String },

    #[error("invalid {component} {value}: {reason}")]
    InvalidComponent {
        component: Component,
        value: String,
        reason: String,
    },
}

impl TemporalError {
    pub(crate) fn malformed(grammar: Grammar, input: &str) -> Self {
        TemporalError::MalformedSyntax {
            grammar,
            input: input.to_string(),
        }
    }

    pub(crate) fn invalid(
        component: Component,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        TemporalError::InvalidComponent {
            component,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// The offending component, if the literal was syntactically valid.
    pub fn component(&self) -> Option<Component> {
        match self {
            TemporalError::MalformedSyntax { .. } => None,
            TemporalError::InvalidComponent { component, .. } => Some(*component),
        }
    }
}
