// SPDX-License-Identifier: PMPL-1.0-or-later
//! Property-based tests for the temporal grammar

use proptest::prelude::*;
use sieve_temporal::{
    days_in_month, parse_date, parse_datetime, parse_duration, parse_time, week_date_to_calendar,
    weeks_in_iso_year, CalendarDate, Component, TemporalError,
};

/// Generate arbitrary valid calendar dates
fn arb_calendar_date() -> impl Strategy<Value = (i32, u32, u32)> {
    (0i32..=9999, 1u32..=12).prop_flat_map(|(y, m)| (Just(y), Just(m), 1..=days_in_month(y, m)))
}

/// Generate arbitrary ISO week dates
fn arb_week_date() -> impl Strategy<Value = (i32, u32, u32)> {
    (1i32..=9998).prop_flat_map(|y| {
        let weeks = weeks_in_iso_year(y).unwrap_or(52);
        (Just(y), 1..=weeks, 1u32..=7)
    })
}

proptest! {
    #[test]
    fn test_calendar_date_roundtrip((y, m, d) in arb_calendar_date()) {
        let literal = format!("{y:04}-{m:02}-{d:02}");
        let parsed = parse_date(&literal).unwrap();
        prop_assert_eq!(parsed.date, CalendarDate { year: y, month: m, day: d });
        prop_assert_eq!(parsed.date.to_string(), literal);
    }

    #[test]
    fn test_day_past_month_end_rejected(
        y in 0i32..=9999,
        m in 1u32..=12,
        extra in 1u32..=5
    ) {
        let day = days_in_month(y, m) + extra;
        prop_assume!(day <= 99);
        let err = parse_date(&format!("{y:04}-{m:02}-{day:02}")).unwrap_err();
        let is_day_error = matches!(
            err,
            TemporalError::InvalidComponent { component: Component::Day, .. }
        );
        prop_assert!(is_day_error);
    }

    #[test]
    fn test_week_date_roundtrip((y, w, d) in arb_week_date()) {
        let date = week_date_to_calendar(y, w, d).unwrap();
        prop_assert_eq!(date.iso_week_date(), Some((y, w, d)));

        let literal = format!("{y:04}-W{w:02}-{d}");
        prop_assert_eq!(parse_date(&literal).unwrap().date, date);
    }

    #[test]
    fn test_weeks_in_year_is_52_or_53(y in 0i32..=9999) {
        let weeks = weeks_in_iso_year(y).unwrap();
        prop_assert!(weeks == 52 || weeks == 53);
    }

    #[test]
    fn test_valid_times_accepted(
        h in 0u32..24,
        m in 0u32..60,
        s in 0u32..60,
        frac in "[0-9]{1,6}"
    ) {
        let literal = format!("{h:02}:{m:02}:{s:02}.{frac}");
        let time = parse_time(&literal).unwrap();
        prop_assert_eq!((time.hour, time.minute, time.second), (h, m, s));
        prop_assert!(time.micros <= 999_999);
    }

    #[test]
    fn test_datetime_without_separator_is_midnight((y, m, d) in arb_calendar_date()) {
        let dt = parse_datetime(&format!("{y:04}-{m:02}-{d:02}")).unwrap();
        prop_assert_eq!(dt.time.hour + dt.time.minute + dt.time.second + dt.time.micros, 0);
        prop_assert!(dt.offset.is_none());
    }

    #[test]
    fn test_duration_components_roundtrip(
        years in any::<i32>(),
        days in any::<i32>(),
        seconds in any::<i32>()
    ) {
        let literal = format!("P{years}Y{days}DT{seconds}S");
        let duration = parse_duration(&literal).unwrap();
        prop_assert_eq!(duration.years, Some(i64::from(years)));
        prop_assert_eq!(duration.days, Some(i64::from(days)));
        prop_assert_eq!(duration.seconds, Some(i64::from(seconds)));
        prop_assert_eq!(duration.to_string(), literal);
    }

    #[test]
    fn test_parsers_never_panic(input in "\\PC{0,32}") {
        let _ = parse_date(&input);
        let _ = parse_time(&input);
        let _ = parse_datetime(&input);
        let _ = parse_duration(&input);
    }
}

#[test]
fn test_values_serialize() {
    let dt = parse_datetime("2017-01-01T12:00+01:00").unwrap();
    let json = serde_json::to_value(dt).unwrap();
    assert_eq!(json["date"]["year"], 2017);
    assert_eq!(json["offset"]["hours"], 1);
}
