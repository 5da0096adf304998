// SPDX-License-Identifier: PMPL-1.0-or-later
//! Sieve Condition
//!
//! Resolves JSON condition documents into validated predicate trees.
//! A document is either a boolean node or a lookup:
//!
//! ```json
//! { "kind": "and", "conditions": [
//!     { "kind": "lookup", "field": "released__year", "lookup": "exact", "value": 2020 },
//!     { "kind": "lookup", "field": "released", "lookup": "gte", "value": "P-1M" }
//! ] }
//! ```
//!
//! Resolution either yields a complete [`ConditionNode`] tree or every error
//! found in the document. Executors consume the tree through
//! [`PredicateVisitor`].

pub mod engine;
pub mod error;
pub mod explain;
pub mod node;
pub mod query;
pub mod visitor;

pub use engine::{
    ConditionEngine, ConditionEngineBuilder, ConditionHandler, ResolveContext, KIND_KEY,
};
pub use error::{Diagnostic, ResolutionErrors, ResolveError};
pub use explain::Explain;
pub use node::{ConditionNode, LookupNode};
pub use query::Query;
pub use visitor::PredicateVisitor;

pub use sieve_temporal::TemporalError;
