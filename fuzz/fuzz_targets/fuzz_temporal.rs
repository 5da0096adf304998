// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for the temporal literal grammars

#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve_temporal::{parse_date, parse_datetime, parse_duration, parse_time};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_date(s);
        let _ = parse_time(s);
        let _ = parse_datetime(s);
        // Accepted durations print back to something the parser accepts.
        if let Ok(duration) = parse_duration(s) {
            assert!(parse_duration(&duration.to_string()).is_ok());
        }
    }
});
