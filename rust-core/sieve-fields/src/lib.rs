// SPDX-License-Identifier: PMPL-1.0-or-later
//! Sieve Fields
//!
//! Declares the queryable attributes a condition document may reference.
//! Each [`FieldDescriptor`] owns the validation and preparation rules for
//! its [`ValueKind`]; a [`FieldRegistry`] is assembled once and shared
//! read-only by every resolution against it.

pub mod config;
pub mod constraint;
pub mod error;
pub mod field;
pub mod registry;
pub mod value;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use config::{FieldConfig, RegistryConfig};
pub use constraint::{Choice, ChoiceConstraint, Constraint, RangeConstraint};
pub use error::{FieldError, RegistryError};
pub use field::{FieldDescription, FieldDescriptor, ValidatedValue, MEMBERSHIP_LOOKUP};
pub use registry::{FieldRegistry, FieldRegistryBuilder};
pub use value::{PreparedValue, Resolution, Scalar};

/// The value kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[serde(alias = "integer")]
    Int,
    Float,
    String,
    #[serde(alias = "bool")]
    Boolean,
    Date,
    Time,
    DateTime,
    Year,
    Month,
    Week,
    Day,
    #[serde(alias = "week_day")]
    WeekDay,
    Hour,
    Minute,
    Second,
}

impl ValueKind {
    pub const ALL: [ValueKind; 15] = [
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::String,
        ValueKind::Boolean,
        ValueKind::Date,
        ValueKind::Time,
        ValueKind::DateTime,
        ValueKind::Year,
        ValueKind::Month,
        ValueKind::Week,
        ValueKind::Day,
        ValueKind::WeekDay,
        ValueKind::Hour,
        ValueKind::Minute,
        ValueKind::Second,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Boolean => "boolean",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::DateTime => "datetime",
            ValueKind::Year => "year",
            ValueKind::Month => "month",
            ValueKind::Week => "week",
            ValueKind::Day => "day",
            ValueKind::WeekDay => "weekday",
            ValueKind::Hour => "hour",
            ValueKind::Minute => "minute",
            ValueKind::Second => "second",
        }
    }

    /// The JSON type a caller has to send for this kind.
    pub fn input_kind(self) -> InputKind {
        match self {
            ValueKind::Float => InputKind::Number,
            ValueKind::String | ValueKind::Date | ValueKind::Time | ValueKind::DateTime => {
                InputKind::String
            }
            ValueKind::Boolean => InputKind::Boolean,
            _ => InputKind::Int,
        }
    }

    /// Constraint every field of this kind starts with.
    pub fn default_constraint(self) -> Constraint {
        match self {
            ValueKind::Month => Constraint::Choice(ChoiceConstraint::months()),
            ValueKind::WeekDay => Constraint::Choice(ChoiceConstraint::weekdays()),
            ValueKind::Week => Constraint::Range(RangeConstraint::inclusive(1, 53)),
            ValueKind::Day => Constraint::Range(RangeConstraint::inclusive(1, 31)),
            ValueKind::Hour => Constraint::Range(RangeConstraint::inclusive(0, 23)),
            ValueKind::Minute | ValueKind::Second => {
                Constraint::Range(RangeConstraint::inclusive(0, 59))
            }
            _ => Constraint::None,
        }
    }

    /// Whether `constraint` has the shape this kind requires. The payload may
    /// differ from the default but its presence may not.
    pub fn accepts(self, constraint: &Constraint) -> bool {
        matches!(
            (self.default_constraint(), constraint),
            (Constraint::None, Constraint::None)
                | (Constraint::Range(_), Constraint::Range(_))
                | (Constraint::Choice(_), Constraint::Choice(_))
        )
    }

    /// Human description of an acceptable scalar, used in type errors.
    pub fn expected(self) -> &'static str {
        match self {
            ValueKind::Float => "a number",
            ValueKind::String => "a string",
            ValueKind::Boolean => "a boolean",
            ValueKind::Date => "an ISO8601 date or duration",
            ValueKind::Time => "an ISO8601 time",
            ValueKind::DateTime => "an ISO8601 datetime or duration",
            _ => "an integer",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int" | "integer" => Ok(ValueKind::Int),
            "float" => Ok(ValueKind::Float),
            "string" => Ok(ValueKind::String),
            "boolean" | "bool" => Ok(ValueKind::Boolean),
            "date" => Ok(ValueKind::Date),
            "time" => Ok(ValueKind::Time),
            "datetime" => Ok(ValueKind::DateTime),
            "year" => Ok(ValueKind::Year),
            "month" => Ok(ValueKind::Month),
            "week" => Ok(ValueKind::Week),
            "day" => Ok(ValueKind::Day),
            "weekday" | "week_day" => Ok(ValueKind::WeekDay),
            "hour" => Ok(ValueKind::Hour),
            "minute" => Ok(ValueKind::Minute),
            "second" => Ok(ValueKind::Second),
            _ => Err(RegistryError::UnknownKind(s.to_string())),
        }
    }
}

/// JSON input type expected by a field, for UI generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Int,
    Number,
    String,
    Boolean,
}
