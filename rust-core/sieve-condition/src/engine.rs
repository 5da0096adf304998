// SPDX-License-Identifier: PMPL-1.0-or-later
//! Condition resolution.
//!
//! A condition document is a JSON object with a `kind` key. The kind selects
//! a [`ConditionHandler`] from the engine's dispatch table, which is fixed
//! once [`ConditionEngineBuilder::build`] returns. Handlers recurse through
//! [`ResolveContext`], which tracks the JSON-pointer path of the node being
//! resolved and collects every error reported along the way.

use serde_json::{Map, Value};
use sieve_fields::FieldRegistry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{Diagnostic, ResolutionErrors, ResolveError};
use crate::node::{ConditionNode, LookupNode};
use crate::query::Query;

/// Key holding a condition's kind.
pub const KIND_KEY: &str = "kind";

/// Builds one kind of condition node.
///
/// `body` is the whole condition object, `kind` included. Return `None`
/// after reporting at least one error through `ctx`; a handler that returns
/// `None` silently gets a generic [`ResolveError::InvalidCondition`].
pub trait ConditionHandler: Send + Sync {
    fn resolve(
        &self,
        body: &Map<String, Value>,
        ctx: &mut ResolveContext<'_>,
    ) -> Option<ConditionNode>;
}

impl<F> ConditionHandler for F
where
    F: Fn(&Map<String, Value>, &mut ResolveContext<'_>) -> Option<ConditionNode> + Send + Sync,
{
    fn resolve(
        &self,
        body: &Map<String, Value>,
        ctx: &mut ResolveContext<'_>,
    ) -> Option<ConditionNode> {
        self(body, ctx)
    }
}

/// Resolves condition documents against a field registry.
///
/// Immutable after construction; clone it or share it behind an `Arc`.
#[derive(Clone)]
pub struct ConditionEngine {
    registry: Arc<FieldRegistry>,
    handlers: HashMap<String, Arc<dyn ConditionHandler>>,
}

impl ConditionEngine {
    /// Engine with the built-in `and`, `or` and `lookup` kinds.
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self::builder(registry).build()
    }

    pub fn builder(registry: Arc<FieldRegistry>) -> ConditionEngineBuilder {
        ConditionEngineBuilder::new(registry)
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn supports(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Resolve `document` into a predicate tree.
    ///
    /// Every child of a boolean node is resolved even after a sibling fails,
    /// so the error list covers the whole document.
    pub fn resolve(&self, document: &Value) -> Result<ConditionNode, ResolutionErrors> {
        let mut ctx = ResolveContext::new(self);
        let node = ctx.resolve(document);

        if !ctx.errors.is_empty() {
            debug!(errors = ctx.errors.len(), "Condition document rejected");
            return Err(ResolutionErrors::new(ctx.errors));
        }
        match node {
            Some(node) => {
                debug!(
                    depth = node.depth(),
                    lookups = node.lookup_count(),
                    "Condition document resolved"
                );
                Ok(node)
            }
            // ResolveContext::resolve reports whenever it yields None.
            None => Err(ResolutionErrors::new(vec![Diagnostic {
                path: String::new(),
                error: ResolveError::InvalidCondition("no condition produced".to_string()),
            }])),
        }
    }

    /// Resolve `document` and keep it alongside the outcome.
    pub fn query(&self, document: Value) -> Query {
        let outcome = self.resolve(&document);
        Query::new(document, outcome)
    }

    pub fn is_valid(&self, document: &Value) -> bool {
        self.resolve(document).is_ok()
    }
}

impl fmt::Debug for ConditionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionEngine")
            .field("fields", &self.registry.len())
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Assembles a [`ConditionEngine`] dispatch table.
pub struct ConditionEngineBuilder {
    registry: Arc<FieldRegistry>,
    handlers: HashMap<String, Arc<dyn ConditionHandler>>,
}

impl ConditionEngineBuilder {
    fn new(registry: Arc<FieldRegistry>) -> Self {
        let builder = Self {
            registry,
            handlers: HashMap::new(),
        };
        builder
            .register("and", resolve_and)
            .register("or", resolve_or)
            .register("lookup", resolve_lookup)
    }

    /// Add a condition kind. Registering an existing kind replaces it.
    pub fn register(
        mut self,
        kind: impl Into<String>,
        handler: impl ConditionHandler + 'static,
    ) -> Self {
        self.handlers.insert(kind.into(), Arc::new(handler));
        self
    }

    pub fn build(self) -> ConditionEngine {
        debug!(
            kinds = self.handlers.len(),
            fields = self.registry.len(),
            "Condition engine built"
        );
        ConditionEngine {
            registry: self.registry,
            handlers: self.handlers,
        }
    }
}

/// State of one resolution: where in the document we are and what has gone
/// wrong so far.
pub struct ResolveContext<'a> {
    engine: &'a ConditionEngine,
    path: Vec<String>,
    errors: Vec<Diagnostic>,
}

impl<'a> ResolveContext<'a> {
    fn new(engine: &'a ConditionEngine) -> Self {
        Self {
            engine,
            path: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'a FieldRegistry {
        let engine: &'a ConditionEngine = self.engine;
        &engine.registry
    }

    /// JSON pointer to the node being resolved.
    pub fn path(&self) -> String {
        self.path
            .iter()
            .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Record an error against the current node.
    pub fn report(&mut self, error: impl Into<ResolveError>) {
        let error = error.into();
        let path = self.path();
        trace!(path = %path, field = ?error.field(), error = %error, "Condition rejected");
        self.errors.push(Diagnostic { path, error });
    }

    /// Resolve a condition at the current path through the dispatch table.
    pub fn resolve(&mut self, document: &Value) -> Option<ConditionNode> {
        let Some(body) = document.as_object() else {
            self.report(ResolveError::NotAnObject);
            return None;
        };
        let kind = match body.get(KIND_KEY).and_then(Value::as_str) {
            Some(kind) if !kind.is_empty() => kind,
            _ => {
                self.report(ResolveError::MissingConditionKind);
                return None;
            }
        };
        let engine = self.engine;
        let Some(handler) = engine.handlers.get(kind) else {
            self.report(ResolveError::UnknownConditionKind {
                kind: kind.to_string(),
            });
            return None;
        };

        let reported = self.errors.len();
        let node = handler.resolve(body, self);
        if node.is_none() && self.errors.len() == reported {
            self.report(ResolveError::InvalidCondition(format!(
                "{kind} condition could not be resolved"
            )));
        }
        node
    }

    /// Resolve `document` as the child found under `segment`.
    pub fn resolve_child(
        &mut self,
        segment: impl ToString,
        document: &Value,
    ) -> Option<ConditionNode> {
        self.path.push(segment.to_string());
        let node = self.resolve(document);
        self.path.pop();
        node
    }

    /// Resolve every element of the non-empty `conditions` list in `body`.
    ///
    /// All elements are resolved regardless of earlier failures. Returns the
    /// children only when every one of them resolved.
    pub fn resolve_conditions(&mut self, body: &Map<String, Value>) -> Option<Vec<ConditionNode>> {
        let items = match body.get("conditions").and_then(Value::as_array) {
            Some(items) if !items.is_empty() => items,
            _ => {
                self.report(ResolveError::EmptyConditionList);
                return None;
            }
        };

        self.path.push("conditions".to_string());
        let resolved: Vec<Option<ConditionNode>> = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.resolve_child(i, item))
            .collect();
        self.path.pop();

        resolved.into_iter().collect()
    }

    /// String value of `key`, reporting [`ResolveError::MissingKey`] when it
    /// is absent or not a string.
    pub fn string_key<'v>(&mut self, body: &'v Map<String, Value>, key: &str) -> Option<&'v str> {
        let value = body.get(key).and_then(Value::as_str);
        if value.is_none() {
            self.report(ResolveError::MissingKey {
                key: key.to_string(),
            });
        }
        value
    }

    /// Validate `value` for `field` and `lookup` and build the leaf node.
    pub fn lookup(&mut self, field: &str, lookup: &str, value: &Value) -> Option<ConditionNode> {
        let Some(descriptor) = self.registry().get(field) else {
            self.report(ResolveError::UnknownField {
                name: field.to_string(),
            });
            return None;
        };
        match descriptor.validate(value, lookup) {
            Ok(validated) => Some(ConditionNode::Lookup(LookupNode {
                field: Arc::clone(descriptor),
                lookup: lookup.to_string(),
                value: validated.prepare(),
            })),
            Err(err) => {
                self.report(err);
                None
            }
        }
    }
}

fn resolve_and(body: &Map<String, Value>, ctx: &mut ResolveContext<'_>) -> Option<ConditionNode> {
    ctx.resolve_conditions(body).map(ConditionNode::And)
}

fn resolve_or(body: &Map<String, Value>, ctx: &mut ResolveContext<'_>) -> Option<ConditionNode> {
    ctx.resolve_conditions(body).map(ConditionNode::Or)
}

fn resolve_lookup(
    body: &Map<String, Value>,
    ctx: &mut ResolveContext<'_>,
) -> Option<ConditionNode> {
    let field = ctx.string_key(body, "field")?;
    let lookup = ctx.string_key(body, "lookup")?;
    let value = body.get("value").unwrap_or(&Value::Null);
    ctx.lookup(field, lookup, value)
}
