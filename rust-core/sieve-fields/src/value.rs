// SPDX-License-Identifier: PMPL-1.0-or-later
//! Backend-ready values produced by field preparation.

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use sieve_temporal::{
    CalendarDate, DatePrecision, IsoDate, IsoDateTime, IsoDuration, TimeOfDay, UtcOffset,
};
use std::fmt;

/// What a relative (duration) value resolves to at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Date,
    DateTime,
}

/// A single prepared value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    /// Wide enough for every JSON integer, signed or unsigned.
    Integer(i128),
    Float(f64),
    String(String),
    Boolean(bool),
    Date(IsoDate),
    Time(TimeOfDay),
    DateTime(IsoDateTime),
    /// "Now" shifted by a duration. Left unresolved until execution.
    Relative {
        duration: IsoDuration,
        resolution: Resolution,
    },
}

impl Scalar {
    pub fn is_relative(&self) -> bool {
        matches!(self, Scalar::Relative { .. })
    }

    /// Replace a relative value with the concrete date or instant it denotes
    /// at `now`. Absolute values are returned unchanged. `None` when the
    /// shifted instant is not representable.
    pub fn resolve_relative(&self, now: DateTime<Utc>) -> Option<Scalar> {
        let Scalar::Relative {
            duration,
            resolution,
        } = self
        else {
            return Some(self.clone());
        };

        let instant = duration.apply_to(now)?;
        let date = CalendarDate::from_naive(instant.date_naive());
        Some(match resolution {
            Resolution::Date => Scalar::Date(IsoDate {
                date,
                precision: DatePrecision::Day,
            }),
            Resolution::DateTime => Scalar::DateTime(IsoDateTime {
                date,
                time: TimeOfDay {
                    hour: instant.hour(),
                    minute: instant.minute(),
                    second: instant.second(),
                    // Leap-second nanos above 999_999_999 are clamped.
                    micros: (instant.nanosecond() / 1_000).min(999_999),
                },
                offset: Some(UtcOffset::UTC),
            }),
        })
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::String(v) => write!(f, "{v:?}"),
            Scalar::Boolean(v) => write!(f, "{v}"),
            Scalar::Date(v) => write!(f, "{v}"),
            Scalar::Time(v) => write!(f, "{v}"),
            Scalar::DateTime(v) => write!(f, "{v}"),
            Scalar::Relative { duration, .. } => write!(f, "now+{duration}"),
        }
    }
}

/// The value a lookup node hands to an executor: one scalar, or every
/// element of a membership (`in`) list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PreparedValue {
    Single(Scalar),
    Many(Vec<Scalar>),
}

impl PreparedValue {
    pub fn scalars(&self) -> &[Scalar] {
        match self {
            PreparedValue::Single(s) => std::slice::from_ref(s),
            PreparedValue::Many(items) => items,
        }
    }

    pub fn has_relative(&self) -> bool {
        self.scalars().iter().any(Scalar::is_relative)
    }

    /// Resolve every relative scalar against `now`.
    pub fn resolve_relative(&self, now: DateTime<Utc>) -> Option<PreparedValue> {
        Some(match self {
            PreparedValue::Single(s) => PreparedValue::Single(s.resolve_relative(now)?),
            PreparedValue::Many(items) => PreparedValue::Many(
                items
                    .iter()
                    .map(|s| s.resolve_relative(now))
                    .collect::<Option<Vec<_>>>()?,
            ),
        })
    }
}

impl fmt::Display for PreparedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreparedValue::Single(s) => s.fmt(f),
            PreparedValue::Many(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn relative(days: i64, resolution: Resolution) -> Scalar {
        Scalar::Relative {
            duration: IsoDuration {
                days: Some(days),
                ..Default::default()
            },
            resolution,
        }
    }

    #[test]
    fn test_resolve_relative_date() {
        let now = Utc.with_ymd_and_hms(2017, 1, 1, 15, 30, 0).unwrap();
        let resolved = relative(-1, Resolution::Date).resolve_relative(now).unwrap();
        assert_eq!(
            resolved,
            Scalar::Date(IsoDate {
                date: CalendarDate { year: 2016, month: 12, day: 31 },
                precision: DatePrecision::Day,
            })
        );
    }

    #[test]
    fn test_resolve_relative_datetime() {
        let now = Utc.with_ymd_and_hms(2017, 1, 1, 15, 30, 0).unwrap();
        let Some(Scalar::DateTime(dt)) = relative(1, Resolution::DateTime).resolve_relative(now)
        else {
            panic!("expected a datetime");
        };
        assert_eq!(dt.to_string(), "2017-01-02T15:30:00+00:00");
    }

    #[test]
    fn test_absolute_values_unchanged() {
        let now = Utc::now();
        let value = PreparedValue::Many(vec![Scalar::Integer(1), relative(0, Resolution::Date)]);
        assert!(value.has_relative());
        let resolved = value.resolve_relative(now).unwrap();
        assert!(!resolved.has_relative());
        assert_eq!(resolved.scalars()[0], Scalar::Integer(1));
    }

    #[test]
    fn test_display() {
        let value = PreparedValue::Many(vec![
            Scalar::String("a".into()),
            Scalar::Boolean(true),
            Scalar::Float(1.5),
        ]);
        assert_eq!(value.to_string(), "[\"a\", true, 1.5]");
        assert_eq!(relative(-1, Resolution::Date).to_string(), "now+P-1D");
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(PreparedValue::Single(Scalar::Integer(3))).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "integer", "value": 3 }));
    }
}
