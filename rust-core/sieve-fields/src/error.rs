// SPDX-License-Identifier: PMPL-1.0-or-later
//! Field and registry error types.

use sieve_temporal::TemporalError;
use thiserror::Error;

use crate::constraint::RangeConstraint;
use crate::ValueKind;

/// A value rejected by a field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("unsupported lookup {lookup:?} for field {field:?}")]
    UnsupportedLookup { field: String, lookup: String },

    #[error("field {field:?} expects {expected}")]
    TypeMismatch { field: String, expected: String },

    #[error("value {value} for field {field:?} is outside {bound}")]
    OutOfRange {
        field: String,
        value: i128,
        bound: RangeConstraint,
    },

    #[error("value {value} for field {field:?} is not one of {allowed:?}")]
    InvalidChoice {
        field: String,
        value: i128,
        allowed: Vec<i64>,
    },

    #[error("field {field:?}: {source}")]
    Temporal {
        field: String,
        #[source]
        source: TemporalError,
    },
}

impl FieldError {
    /// Name of the field that rejected the value.
    pub fn field(&self) -> &str {
        match self {
            FieldError::UnsupportedLookup { field, .. }
            | FieldError::TypeMismatch { field, .. }
            | FieldError::OutOfRange { field, .. }
            | FieldError::InvalidChoice { field, .. }
            | FieldError::Temporal { field, .. } => field,
        }
    }
}

/// Errors raised while assembling a registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    #[error("field {0:?} allows no lookups")]
    NoLookups(String),

    #[error("field {field:?} of kind {kind} cannot carry this constraint")]
    ConstraintMismatch { field: String, kind: ValueKind },

    #[error("field {0:?} declares no choices")]
    EmptyChoices(String),

    #[error("field {0:?} declares an empty range")]
    EmptyRange(String),

    #[error("unknown value kind: {0}")]
    UnknownKind(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
