// SPDX-License-Identifier: PMPL-1.0-or-later
//! Range and choice constraints attached to integer fields.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FieldError;

/// Inclusive integer bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeConstraint {
    pub min: i64,
    pub max: i64,
}

impl RangeConstraint {
    pub const fn inclusive(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// `start..end`, end excluded.
    pub const fn half_open(start: i64, end: i64) -> Self {
        Self {
            min: start,
            max: end - 1,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

impl fmt::Display for RangeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// One allowed value and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice {
    pub key: i64,
    pub label: String,
}

/// Ordered set of allowed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceConstraint {
    choices: Vec<Choice>,
}

impl ChoiceConstraint {
    pub fn new<I, L>(choices: I) -> Self
    where
        I: IntoIterator<Item = (i64, L)>,
        L: Into<String>,
    {
        Self {
            choices: choices
                .into_iter()
                .map(|(key, label)| Choice {
                    key,
                    label: label.into(),
                })
                .collect(),
        }
    }

    /// Months of the year, 1 = January.
    pub fn months() -> Self {
        Self::new([
            (1, "January"),
            (2, "February"),
            (3, "March"),
            (4, "April"),
            (5, "May"),
            (6, "June"),
            (7, "July"),
            (8, "August"),
            (9, "September"),
            (10, "October"),
            (11, "November"),
            (12, "December"),
        ])
    }

    /// Days of the week as numbered by SQL day-of-week extraction
    /// (1 = Sunday, 7 = Saturday), listed Monday first.
    pub fn weekdays() -> Self {
        Self::new([
            (2, "Monday"),
            (3, "Tuesday"),
            (4, "Wednesday"),
            (5, "Thursday"),
            (6, "Friday"),
            (7, "Saturday"),
            (1, "Sunday"),
        ])
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn keys(&self) -> Vec<i64> {
        self.choices.iter().map(|c| c.key).collect()
    }

    pub fn contains(&self, key: i64) -> bool {
        self.choices.iter().any(|c| c.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

impl From<Vec<Choice>> for ChoiceConstraint {
    fn from(choices: Vec<Choice>) -> Self {
        Self { choices }
    }
}

/// Constraint payload carried by a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Constraint {
    #[default]
    None,
    Range(RangeConstraint),
    Choice(ChoiceConstraint),
}

impl Constraint {
    /// Check an already type-checked integer. Values outside `i64` fail
    /// every range and choice.
    pub fn check(&self, field: &str, value: i128) -> Result<(), FieldError> {
        let narrow = i64::try_from(value).ok();
        match self {
            Constraint::None => Ok(()),
            Constraint::Range(range) if narrow.is_some_and(|v| range.contains(v)) => Ok(()),
            Constraint::Range(range) => Err(FieldError::OutOfRange {
                field: field.to_string(),
                value,
                bound: *range,
            }),
            Constraint::Choice(choices) if narrow.is_some_and(|v| choices.contains(v)) => Ok(()),
            Constraint::Choice(choices) => Err(FieldError::InvalidChoice {
                field: field.to_string(),
                value,
                allowed: choices.keys(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open_range() {
        let range = RangeConstraint::half_open(1, 54);
        assert_eq!(range, RangeConstraint::inclusive(1, 53));
        assert!(range.contains(53));
        assert!(!range.contains(54));
        assert!(!range.contains(0));
        assert_eq!(range.to_string(), "1..=53");
    }

    #[test]
    fn test_month_choices() {
        let months = ChoiceConstraint::months();
        assert_eq!(months.keys(), (1..=12).collect::<Vec<_>>());
        assert_eq!(months.choices()[0].label, "January");
    }

    #[test]
    fn test_weekday_choices_order() {
        let days = ChoiceConstraint::weekdays();
        assert_eq!(days.keys(), vec![2, 3, 4, 5, 6, 7, 1]);
        assert!(days.contains(1));
        assert!(!days.contains(8));
    }

    #[test]
    fn test_constraint_check() {
        let range = Constraint::Range(RangeConstraint::inclusive(0, 23));
        assert!(range.check("hour", 23).is_ok());
        assert!(matches!(
            range.check("hour", 24),
            Err(FieldError::OutOfRange { value: 24, .. })
        ));

        let choice = Constraint::Choice(ChoiceConstraint::months());
        assert!(matches!(
            choice.check("month", 13),
            Err(FieldError::InvalidChoice { value: 13, .. })
        ));
        assert!(Constraint::None.check("year", -5).is_ok());

        let huge = i128::from(u64::MAX);
        assert!(Constraint::None.check("year", huge).is_ok());
        assert!(matches!(
            range.check("hour", huge),
            Err(FieldError::OutOfRange { value, .. }) if value == huge
        ));
        assert!(choice.check("month", i128::from(i64::MIN) - 1).is_err());
    }

    #[test]
    fn test_choices_serialize_as_list() {
        let json = serde_json::to_value(ChoiceConstraint::new([(1, "One")])).unwrap();
        assert_eq!(json, serde_json::json!([{ "key": 1, "label": "One" }]));
    }
}
