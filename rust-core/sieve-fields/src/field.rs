// SPDX-License-Identifier: PMPL-1.0-or-later
//! Field descriptors: per-kind validation, preparation and self-description.

use serde::Serialize;
use serde_json::Value;
use sieve_temporal::{parse_date, parse_datetime, parse_duration, parse_time, TemporalError};
use std::collections::BTreeSet;
use tracing::trace;

use crate::constraint::{Choice, Constraint, RangeConstraint};
use crate::error::FieldError;
use crate::value::{PreparedValue, Resolution, Scalar};
use crate::{InputKind, ValueKind};

/// The lookup whose value is a list, each element checked on its own.
pub const MEMBERSHIP_LOOKUP: &str = "in";

/// One queryable attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    storage_name: String,
    label: String,
    kind: ValueKind,
    lookups: BTreeSet<String>,
    constraint: Constraint,
}

/// A value that passed [`FieldDescriptor::validate`].
///
/// Holding one is the proof that preparation is allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedValue(PreparedValue);

impl ValidatedValue {
    /// Backend-ready form of the value.
    pub fn prepare(self) -> PreparedValue {
        self.0
    }

    pub fn as_prepared(&self) -> &PreparedValue {
        &self.0
    }
}

/// Static self-description of a field, consumed by UI generators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescription {
    pub name: String,
    pub label: String,
    pub input_kind: InputKind,
    pub value_kind: ValueKind,
    pub lookups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeConstraint>,
}

impl FieldDescriptor {
    /// A field addressed by its own name, labelled from it
    /// (`release_date` -> `release date`), with the kind's default constraint
    /// and no lookups yet.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        let name = name.into();
        Self {
            storage_name: name.clone(),
            label: name.replace('_', " "),
            name,
            kind,
            lookups: BTreeSet::new(),
            constraint: kind.default_constraint(),
        }
    }

    pub fn lookups<I, S>(mut self, lookups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lookups.extend(lookups.into_iter().map(Into::into));
        self
    }

    pub fn storage_name(mut self, storage_name: impl Into<String>) -> Self {
        self.storage_name = storage_name.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Replace the constraint payload. The registry rejects a constraint
    /// whose shape does not fit the kind.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &str {
        &self.storage_name
    }

    pub fn display_label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn allowed_lookups(&self) -> impl Iterator<Item = &str> {
        self.lookups.iter().map(String::as_str)
    }

    pub fn supports(&self, lookup: &str) -> bool {
        self.lookups.contains(lookup)
    }

    pub fn constraint_ref(&self) -> &Constraint {
        &self.constraint
    }

    /// Check `raw` for use with `lookup`.
    ///
    /// The lookup is checked before the value. For the membership lookup the
    /// value must be a list and every element must pass the scalar check on
    /// its own; the first failing element is reported.
    pub fn validate(&self, raw: &Value, lookup: &str) -> Result<ValidatedValue, FieldError> {
        if !self.supports(lookup) {
            return Err(FieldError::UnsupportedLookup {
                field: self.name.clone(),
                lookup: lookup.to_string(),
            });
        }

        let prepared = if lookup == MEMBERSHIP_LOOKUP {
            let items = raw.as_array().ok_or_else(|| FieldError::TypeMismatch {
                field: self.name.clone(),
                expected: format!("a list of {} values", self.kind),
            })?;
            PreparedValue::Many(
                items
                    .iter()
                    .map(|item| self.check_scalar(item))
                    .collect::<Result<_, _>>()?,
            )
        } else {
            PreparedValue::Single(self.check_scalar(raw)?)
        };

        Ok(ValidatedValue(prepared))
    }

    pub fn is_valid(&self, raw: &Value, lookup: &str) -> bool {
        self.validate(raw, lookup).is_ok()
    }

    fn check_scalar(&self, raw: &Value) -> Result<Scalar, FieldError> {
        let scalar = match self.kind {
            ValueKind::Float => raw.as_f64().map(Scalar::Float),
            ValueKind::String => raw.as_str().map(|s| Scalar::String(s.to_string())),
            ValueKind::Boolean => raw.as_bool().map(Scalar::Boolean),
            ValueKind::Date => match raw.as_str() {
                Some(s) => Some(self.temporal(s, Resolution::Date, |s| {
                    parse_date(s).map(Scalar::Date)
                })?),
                None => None,
            },
            ValueKind::DateTime => match raw.as_str() {
                Some(s) => Some(self.temporal(s, Resolution::DateTime, |s| {
                    parse_datetime(s).map(Scalar::DateTime)
                })?),
                None => None,
            },
            ValueKind::Time => match raw.as_str() {
                Some(s) => Some(Scalar::Time(parse_time(s).map_err(|e| self.temporal_error(e))?)),
                None => None,
            },
            // Integer kinds. `Value::Bool` never yields a number, so booleans
            // are rejected here even though they are 0/1 representable.
            // Integers above `i64::MAX` arrive as `u64`.
            _ => match raw.as_i64().map(i128::from).or_else(|| raw.as_u64().map(i128::from)) {
                Some(v) => {
                    self.constraint.check(&self.name, v)?;
                    Some(Scalar::Integer(v))
                }
                None => None,
            },
        };

        scalar.ok_or_else(|| {
            trace!(field = %self.name, kind = %self.kind, "value has the wrong type");
            FieldError::TypeMismatch {
                field: self.name.clone(),
                expected: self.kind.expected().to_string(),
            }
        })
    }

    /// Durations are accepted wherever an absolute date or datetime is, and
    /// stay relative until execution.
    fn temporal(
        &self,
        input: &str,
        resolution: Resolution,
        absolute: impl FnOnce(&str) -> Result<Scalar, TemporalError>,
    ) -> Result<Scalar, FieldError> {
        if let Ok(duration) = parse_duration(input) {
            return Ok(Scalar::Relative {
                duration,
                resolution,
            });
        }
        absolute(input).map_err(|e| self.temporal_error(e))
    }

    fn temporal_error(&self, source: TemporalError) -> FieldError {
        trace!(field = %self.name, error = %source, "temporal literal rejected");
        FieldError::Temporal {
            field: self.name.clone(),
            source,
        }
    }

    pub fn describe(&self) -> FieldDescription {
        let (choices, range) = match &self.constraint {
            Constraint::None => (None, None),
            Constraint::Range(range) => (None, Some(*range)),
            Constraint::Choice(choices) => (Some(choices.choices().to_vec()), None),
        };
        FieldDescription {
            name: self.name.clone(),
            label: self.label.clone(),
            input_kind: self.kind.input_kind(),
            value_kind: self.kind,
            lookups: self.lookups.iter().cloned().collect(),
            choices,
            range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sieve_temporal::Component;

    fn field(kind: ValueKind) -> FieldDescriptor {
        FieldDescriptor::new("field", kind).lookups(["exact", "in"])
    }

    fn check(kind: ValueKind, cases: &[(Value, &str, bool)]) {
        let f = field(kind);
        for (value, lookup, ok) in cases {
            assert_eq!(
                f.is_valid(value, lookup),
                *ok,
                "{kind} field with {lookup} {value}"
            );
        }
    }

    #[test]
    fn test_unsupported_lookup_checked_first() {
        let f = field(ValueKind::Int);
        let err = f.validate(&json!("not an int"), "contains").unwrap_err();
        assert_eq!(
            err,
            FieldError::UnsupportedLookup {
                field: "field".into(),
                lookup: "contains".into()
            }
        );
    }

    #[test]
    fn test_integer_field() {
        check(
            ValueKind::Int,
            &[
                (json!("bla"), "exact", false),
                (json!("1"), "exact", false),
                (json!(-1), "exact", true),
                (json!(0), "exact", true),
                (json!(1321321), "exact", true),
                (json!(0.12312), "exact", false),
                (json!(true), "exact", false),
                (json!(false), "exact", false),
                (json!([1, 2]), "in", true),
                (json!([1]), "in", true),
                (json!([1, 1.5]), "in", false),
                (json!(1), "in", false),
            ],
        );
    }

    #[test]
    fn test_integers_beyond_i64() {
        let above: Value = serde_json::from_str("9223372036854775808").unwrap();
        for kind in [ValueKind::Int, ValueKind::Year] {
            let prepared = field(kind).validate(&above, "exact").unwrap().prepare();
            assert_eq!(
                prepared,
                PreparedValue::Single(Scalar::Integer(9_223_372_036_854_775_808))
            );
        }
        assert_eq!(
            field(ValueKind::Year).validate(&json!(u64::MAX), "exact").unwrap().prepare(),
            PreparedValue::Single(Scalar::Integer(i128::from(u64::MAX)))
        );
        // Out of every range, but still an integer.
        assert!(matches!(
            field(ValueKind::Hour).validate(&above, "exact"),
            Err(FieldError::OutOfRange { .. })
        ));
        assert!(matches!(
            field(ValueKind::Month).validate(&above, "exact"),
            Err(FieldError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_float_field() {
        check(
            ValueKind::Float,
            &[
                (json!("1"), "exact", false),
                (json!(-1), "exact", true),
                (json!(412.321), "exact", true),
                (json!([1, 1.5]), "in", true),
                (json!(true), "exact", false),
            ],
        );
        let prepared = field(ValueKind::Float).validate(&json!(2), "exact").unwrap().prepare();
        assert_eq!(prepared, PreparedValue::Single(Scalar::Float(2.0)));
    }

    #[test]
    fn test_string_field() {
        check(
            ValueKind::String,
            &[
                (json!("bla"), "exact", true),
                (json!(""), "exact", true),
                (json!("1\n2\n3"), "exact", true),
                (json!(-1), "exact", false),
                (json!([1, 1.5]), "in", false),
                (json!(["a", "b"]), "in", true),
            ],
        );
    }

    #[test]
    fn test_boolean_field() {
        check(
            ValueKind::Boolean,
            &[
                (json!("true"), "exact", false),
                (json!("False"), "exact", false),
                (json!(0), "exact", false),
                (json!(1), "exact", false),
                (json!(true), "exact", true),
                (json!(false), "exact", true),
                (json!([true, false]), "in", true),
                (json!([""]), "in", false),
            ],
        );
    }

    #[test]
    fn test_date_field() {
        check(
            ValueKind::Date,
            &[
                (json!("bla"), "exact", false),
                (json!(0), "exact", false),
                (json!("2017-01-01"), "exact", true),
                (json!("2000-13-01"), "exact", false),
                (json!("2000-02-29"), "exact", true),
                (json!("2000-02-30"), "exact", false),
                (json!("P-1Y"), "exact", true),
                (json!("P-1M"), "exact", true),
                (json!("P-1D"), "exact", true),
                (json!(["2017-01-01", "2018-01-01"]), "in", true),
            ],
        );
    }

    #[test]
    fn test_date_field_error_detail() {
        let err = field(ValueKind::Date).validate(&json!("2000-02-30"), "exact").unwrap_err();
        let FieldError::Temporal { source, .. } = err else {
            panic!("expected a temporal error");
        };
        assert_eq!(source.component(), Some(Component::Day));
    }

    #[test]
    fn test_date_field_prepares_duration_as_relative() {
        let prepared = field(ValueKind::Date).validate(&json!("P-1D"), "exact").unwrap().prepare();
        assert!(prepared.has_relative());
        let prepared = field(ValueKind::DateTime)
            .validate(&json!("2017-01-01"), "exact")
            .unwrap()
            .prepare();
        let PreparedValue::Single(Scalar::DateTime(dt)) = prepared else {
            panic!("expected a datetime");
        };
        assert_eq!(dt.to_string(), "2017-01-01T00:00:00");
    }

    #[test]
    fn test_time_field() {
        check(
            ValueKind::Time,
            &[
                (json!("-01:00"), "exact", false),
                (json!("00:00"), "exact", true),
                (json!("23:59"), "exact", true),
                (json!("23:60"), "exact", false),
                (json!("24:00"), "exact", false),
                (json!("23:59:59.999999"), "exact", true),
                (json!("23:59:59.9999999"), "exact", false),
                (json!("P1D"), "exact", false),
                (json!(["12:00", "13:00"]), "in", true),
            ],
        );
    }

    #[test]
    fn test_datetime_field() {
        check(
            ValueKind::DateTime,
            &[
                (json!("2017-01-01 01:00"), "exact", false),
                (json!("2017-01-01T-01:00"), "exact", false),
                (json!("2017-02-02T00:00"), "exact", true),
                (json!("2017-01-01T24:00"), "exact", false),
                (json!("2017-01-01T00:00:00Z"), "exact", true),
                (json!("2017-01-01T00:00:00+0000"), "exact", true),
                (json!("2017-01-01T00:00:00+02:00"), "exact", true),
                (json!("P-1D"), "exact", true),
                (json!(["2017-01-01T00:00", "2018-01-01"]), "in", true),
            ],
        );
    }

    #[test]
    fn test_year_field() {
        check(
            ValueKind::Year,
            &[
                (json!("1"), "exact", false),
                (json!(-1), "exact", true),
                (json!(0), "exact", true),
                (json!(2000), "exact", true),
                (json!([2000, 2001]), "in", true),
            ],
        );
    }

    #[test]
    fn test_choice_fields() {
        check(
            ValueKind::Month,
            &[
                (json!("1"), "exact", false),
                (json!(0), "exact", false),
                (json!(1), "exact", true),
                (json!(12), "exact", true),
                (json!(13), "exact", false),
                (json!([1, 2]), "in", true),
                (json!([1, 13]), "in", false),
            ],
        );
        check(
            ValueKind::WeekDay,
            &[
                (json!(0), "exact", false),
                (json!(1), "exact", true),
                (json!(7), "exact", true),
                (json!(8), "exact", false),
            ],
        );
    }

    #[test]
    fn test_range_fields() {
        let bounds = [
            (ValueKind::Week, 1, 53),
            (ValueKind::Day, 1, 31),
            (ValueKind::Hour, 0, 23),
            (ValueKind::Minute, 0, 59),
            (ValueKind::Second, 0, 59),
        ];
        for (kind, min, max) in bounds {
            check(
                kind,
                &[
                    (json!(min), "exact", true),
                    (json!(max), "exact", true),
                    (json!(min - 1), "exact", false),
                    (json!(max + 1), "exact", false),
                    (json!("1"), "exact", false),
                    (json!([1, 2]), "in", true),
                ],
            );
        }
    }

    #[test]
    fn test_membership_requires_list() {
        let err = field(ValueKind::Int).validate(&json!(1), "in").unwrap_err();
        assert!(matches!(err, FieldError::TypeMismatch { .. }));
    }

    #[test]
    fn test_describe() {
        let f = FieldDescriptor::new("release_month", ValueKind::Month)
            .lookups(["exact"])
            .storage_name("released__month");
        let desc = f.describe();
        assert_eq!(desc.label, "release month");
        assert_eq!(desc.input_kind, InputKind::Int);
        assert_eq!(desc.choices.as_ref().map(Vec::len), Some(12));
        assert!(desc.range.is_none());

        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["value_kind"], "month");
        assert_eq!(json["lookups"], json!(["exact"]));
        assert!(json.get("range").is_none());
    }
}
