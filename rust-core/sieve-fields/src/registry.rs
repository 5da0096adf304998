// SPDX-License-Identifier: PMPL-1.0-or-later
//! Build-once, read-only field registry.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::RegistryConfig;
use crate::constraint::Constraint;
use crate::error::RegistryError;
use crate::field::{FieldDescription, FieldDescriptor};

/// Named fields available to condition documents.
///
/// Fields keep their registration order. The registry is immutable once
/// built; share it behind an `Arc` across resolutions and threads.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<Arc<FieldDescriptor>>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder::default()
    }

    /// Build a registry from its declarative configuration.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let mut builder = Self::builder().default_lookups(config.default_lookups.iter().cloned());
        for field in &config.fields {
            builder = builder.field(field.to_descriptor());
        }
        builder.build()
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Self::from_config(&RegistryConfig::from_json(json)?)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FieldDescriptor>> {
        self.fields.iter()
    }

    /// Describe every field, in registration order.
    pub fn describe_all(&self) -> Vec<FieldDescription> {
        self.fields.iter().map(|f| f.describe()).collect()
    }
}

/// Collects field declarations and checks them on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct FieldRegistryBuilder {
    fields: Vec<FieldDescriptor>,
    default_lookups: Vec<String>,
}

impl FieldRegistryBuilder {
    /// Lookups given to every field that declares none of its own.
    pub fn default_lookups<I, S>(mut self, lookups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_lookups = lookups.into_iter().map(Into::into).collect();
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<FieldRegistry, RegistryError> {
        let mut registry = FieldRegistry::default();

        for mut field in self.fields {
            if registry.contains(field.name()) {
                return Err(RegistryError::DuplicateField(field.name().to_string()));
            }
            if field.allowed_lookups().next().is_none() {
                field = field.lookups(self.default_lookups.iter().cloned());
            }
            check_field(&field)?;

            registry
                .index
                .insert(field.name().to_string(), registry.fields.len());
            registry.fields.push(Arc::new(field));
        }

        debug!(fields = registry.len(), "Field registry built");
        Ok(registry)
    }
}

fn check_field(field: &FieldDescriptor) -> Result<(), RegistryError> {
    let name = || field.name().to_string();

    if field.allowed_lookups().next().is_none() {
        return Err(RegistryError::NoLookups(name()));
    }
    let constraint = field.constraint_ref();
    if !field.kind().accepts(constraint) {
        return Err(RegistryError::ConstraintMismatch {
            field: name(),
            kind: field.kind(),
        });
    }
    match constraint {
        Constraint::Range(range) if range.is_empty() => Err(RegistryError::EmptyRange(name())),
        Constraint::Choice(choices) if choices.is_empty() => {
            Err(RegistryError::EmptyChoices(name()))
        }
        _ => Ok(()),
    }
}
