// SPDX-License-Identifier: PMPL-1.0-or-later
//! Human-readable rendering of a resolved condition.

use sieve_fields::PreparedValue;
use std::convert::Infallible;

use crate::visitor::PredicateVisitor;

/// Renders `(a AND b)`, `(a OR b)` and `storage lookup value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Explain;

impl Explain {
    fn join(children: Vec<String>, op: &str) -> String {
        if children.len() == 1 {
            return children.into_iter().next().unwrap_or_default();
        }
        format!("({})", children.join(op))
    }
}

impl PredicateVisitor for Explain {
    type Predicate = String;
    type Error = Infallible;

    fn visit_and(&mut self, children: Vec<String>) -> Result<String, Infallible> {
        Ok(Self::join(children, " AND "))
    }

    fn visit_or(&mut self, children: Vec<String>) -> Result<String, Infallible> {
        Ok(Self::join(children, " OR "))
    }

    fn visit_lookup(
        &mut self,
        storage_name: &str,
        lookup: &str,
        value: &PreparedValue,
    ) -> Result<String, Infallible> {
        Ok(format!("{storage_name} {lookup} {value}"))
    }
}
