// SPDX-License-Identifier: PMPL-1.0-or-later
//! Executor interface.

use sieve_fields::PreparedValue;

/// Turns a resolved [`ConditionNode`](crate::ConditionNode) into whatever a
/// data source understands.
///
/// Nodes are visited post-order, so `visit_and` and `visit_or` receive the
/// predicates already built for their children. Evaluation strategy
/// (short-circuiting, flattening, deduplication) belongs to the implementor.
/// Relative date values arrive unresolved; call
/// [`PreparedValue::resolve_relative`] with the execution instant.
pub trait PredicateVisitor {
    type Predicate;
    type Error;

    fn visit_and(&mut self, children: Vec<Self::Predicate>) -> Result<Self::Predicate, Self::Error>;

    fn visit_or(&mut self, children: Vec<Self::Predicate>) -> Result<Self::Predicate, Self::Error>;

    /// `storage_name` is the field's storage identifier, not its public name.
    fn visit_lookup(
        &mut self,
        storage_name: &str,
        lookup: &str,
        value: &PreparedValue,
    ) -> Result<Self::Predicate, Self::Error>;
}
