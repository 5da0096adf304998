// SPDX-License-Identifier: PMPL-1.0-or-later
//! Declarative registry configuration.
//!
//! This is the interface a schema-introspection layer fills in: one entry per
//! field with its kind, lookups, optional storage name, label and constraint
//! override. Defaults:
//! - default_lookups: `exact`, `in`
//! - storage_name: the field name
//! - label: the field name with `_` replaced by spaces

use serde::{Deserialize, Serialize};

use crate::constraint::{Choice, ChoiceConstraint, Constraint, RangeConstraint};
use crate::error::RegistryError;
use crate::field::FieldDescriptor;
use crate::ValueKind;

/// Configuration for a whole registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Lookups for fields that list none.
    #[serde(default = "default_lookups")]
    pub default_lookups: Vec<String>,
    /// Fields in registration order.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// Configuration for one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lookups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Overrides the kind's default range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeConstraint>,
    /// Overrides the kind's default choices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

fn default_lookups() -> Vec<String> {
    vec!["exact".to_string(), "in".to_string()]
}

impl RegistryConfig {
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_lookups: default_lookups(),
            fields: Vec::new(),
        }
    }
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            lookups: Vec::new(),
            storage_name: None,
            label: None,
            range: None,
            choices: None,
        }
    }

    /// Descriptor for this entry. Constraint shape is checked by the
    /// registry builder, not here.
    pub fn to_descriptor(&self) -> FieldDescriptor {
        let mut field =
            FieldDescriptor::new(&self.name, self.kind).lookups(self.lookups.iter().cloned());
        if let Some(storage_name) = &self.storage_name {
            field = field.storage_name(storage_name);
        }
        if let Some(label) = &self.label {
            field = field.label(label);
        }
        if let Some(range) = self.range {
            field = field.constraint(Constraint::Range(range));
        }
        if let Some(choices) = &self.choices {
            field = field.constraint(Constraint::Choice(ChoiceConstraint::from(choices.clone())));
        }
        field
    }
}
