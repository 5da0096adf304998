// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for condition document resolution

#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve_condition::ConditionEngine;
use sieve_fields::FieldRegistry;
use std::sync::{Arc, OnceLock};

const FIELDS: &str = r#"{
    "fields": [
        { "name": "year", "kind": "year" },
        { "name": "month", "kind": "month" },
        { "name": "day", "kind": "day" },
        { "name": "name", "kind": "string" },
        { "name": "active", "kind": "boolean" },
        { "name": "at", "kind": "datetime", "lookups": ["exact", "gte", "lte"] },
        { "name": "opens", "kind": "time" }
    ]
}"#;

fn engine() -> &'static ConditionEngine {
    static ENGINE: OnceLock<ConditionEngine> = OnceLock::new();
    ENGINE.get_or_init(|| {
        let registry = FieldRegistry::from_json(FIELDS).expect("fuzz registry is valid");
        ConditionEngine::new(Arc::new(registry))
    })
}

fuzz_target!(|data: &[u8]| {
    // Inputs nested deeper than serde_json's recursion limit are rejected
    // before they reach the engine.
    if let Ok(doc) = serde_json::from_slice::<serde_json::Value>(data) {
        let query = engine().query(doc);
        if let Some(errors) = query.errors() {
            assert!(!errors.is_empty());
        }
        if let Some(node) = query.condition() {
            let _ = node.to_string();
        }
    }
});
