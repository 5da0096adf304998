// SPDX-License-Identifier: PMPL-1.0-or-later
//! Resolution error types.

use sieve_fields::FieldError;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Why one node of a condition document was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("condition must be a JSON object")]
    NotAnObject,

    #[error("condition kind not specified")]
    MissingConditionKind,

    #[error("unsupported condition kind: {kind}")]
    UnknownConditionKind { kind: String },

    #[error("conditions must be a list with at least one element")]
    EmptyConditionList,

    #[error("{key:?} must be specified as a string")]
    MissingKey { key: String },

    #[error("unknown field: {name}")]
    UnknownField { name: String },

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("invalid condition: {0}")]
    InvalidCondition(String),
}

impl ResolveError {
    /// The field this error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ResolveError::UnknownField { name } => Some(name),
            ResolveError::Field(err) => Some(err.field()),
            _ => None,
        }
    }
}

/// A rejected node and where it sits in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// JSON pointer to the node, `""` for the root.
    pub path: String,
    pub error: ResolveError,
}

impl Diagnostic {
    pub fn field(&self) -> Option<&str> {
        self.error.field()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "at root: {}", self.error)
        } else {
            write!(f, "at {}: {}", self.path, self.error)
        }
    }
}

/// Every problem found in a rejected document.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("condition document rejected with {} error(s)", .0.len())]
pub struct ResolutionErrors(Vec<Diagnostic>);

impl ResolutionErrors {
    pub(crate) fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self(diagnostics)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.0
    }

    /// Field-level errors grouped by field name, for form displays.
    pub fn by_field(&self) -> BTreeMap<&str, Vec<&ResolveError>> {
        let mut grouped: BTreeMap<&str, Vec<&ResolveError>> = BTreeMap::new();
        for diagnostic in &self.0 {
            if let Some(field) = diagnostic.field() {
                grouped.entry(field).or_default().push(&diagnostic.error);
            }
        }
        grouped
    }

    /// Errors about the document's shape rather than a particular field.
    pub fn structural(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.field().is_none())
    }
}

impl IntoIterator for ResolutionErrors {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
