// SPDX-License-Identifier: PMPL-1.0-or-later
//! Resolved predicate tree.

use sieve_fields::{FieldDescriptor, PreparedValue};
use std::fmt;
use std::sync::Arc;

use crate::explain::Explain;
use crate::visitor::PredicateVisitor;

/// A fully validated condition. Unresolved documents stay `serde_json::Value`;
/// there is no partially resolved node.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    /// Conjunction of at least one child.
    And(Vec<ConditionNode>),
    /// Disjunction of at least one child.
    Or(Vec<ConditionNode>),
    Lookup(LookupNode),
}

/// A comparison of one field against a prepared value.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupNode {
    pub field: Arc<FieldDescriptor>,
    pub lookup: String,
    pub value: PreparedValue,
}

impl ConditionNode {
    pub fn kind(&self) -> &'static str {
        match self {
            ConditionNode::And(_) => "and",
            ConditionNode::Or(_) => "or",
            ConditionNode::Lookup(_) => "lookup",
        }
    }

    /// Fold the tree bottom-up through `visitor`. Children are visited in
    /// document order before their parent.
    pub fn accept<V: PredicateVisitor>(&self, visitor: &mut V) -> Result<V::Predicate, V::Error> {
        match self {
            ConditionNode::And(children) => {
                let predicates = children
                    .iter()
                    .map(|c| c.accept(visitor))
                    .collect::<Result<Vec<_>, _>>()?;
                visitor.visit_and(predicates)
            }
            ConditionNode::Or(children) => {
                let predicates = children
                    .iter()
                    .map(|c| c.accept(visitor))
                    .collect::<Result<Vec<_>, _>>()?;
                visitor.visit_or(predicates)
            }
            ConditionNode::Lookup(node) => {
                visitor.visit_lookup(node.field.storage(), &node.lookup, &node.value)
            }
        }
    }

    /// Nesting depth; a single lookup has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            ConditionNode::And(children) | ConditionNode::Or(children) => {
                1 + children.iter().map(ConditionNode::depth).max().unwrap_or(0)
            }
            ConditionNode::Lookup(_) => 1,
        }
    }

    /// Lookup leaves in document order.
    pub fn lookups(&self) -> Vec<&LookupNode> {
        let mut out = Vec::new();
        self.collect_lookups(&mut out);
        out
    }

    fn collect_lookups<'a>(&'a self, out: &mut Vec<&'a LookupNode>) {
        match self {
            ConditionNode::And(children) | ConditionNode::Or(children) => {
                for child in children {
                    child.collect_lookups(out);
                }
            }
            ConditionNode::Lookup(node) => out.push(node),
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups().len()
    }
}

impl fmt::Display for ConditionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accept(&mut Explain) {
            Ok(rendered) => f.write_str(&rendered),
            Err(never) => match never {},
        }
    }
}
