// SPDX-License-Identifier: PMPL-1.0-or-later
//! A condition document together with its resolution outcome.

use serde_json::Value;

use crate::error::ResolutionErrors;
use crate::node::ConditionNode;
use crate::visitor::PredicateVisitor;

/// Result of [`ConditionEngine::query`](crate::ConditionEngine::query).
///
/// Validity is decided once at resolution; asking again never re-resolves.
#[derive(Debug, Clone)]
pub struct Query {
    document: Value,
    outcome: Result<ConditionNode, ResolutionErrors>,
}

impl Query {
    pub(crate) fn new(document: Value, outcome: Result<ConditionNode, ResolutionErrors>) -> Self {
        Self { document, outcome }
    }

    /// The document as submitted.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn condition(&self) -> Option<&ConditionNode> {
        self.outcome.as_ref().ok()
    }

    pub fn errors(&self) -> Option<&ResolutionErrors> {
        self.outcome.as_ref().err()
    }

    pub fn into_result(self) -> Result<ConditionNode, ResolutionErrors> {
        self.outcome
    }

    /// Build the executor's predicate. `None` for an invalid query.
    pub fn predicate<V: PredicateVisitor>(
        &self,
        visitor: &mut V,
    ) -> Option<Result<V::Predicate, V::Error>> {
        self.condition().map(|node| node.accept(visitor))
    }
}
