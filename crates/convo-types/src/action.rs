//! The Action Descriptor and a fluent builder for it.
//!
//! Registration is explicit-schema rather than reflection-based: a host
//! registers an action by handing the catalog a closure together with
//! its ordered parameter list, the way `dsl-core`'s YAML-driven verb
//! definitions pair a verb name with its argument schema and a handler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::collections::OrderedMap;
use crate::param::ParamDescriptor;
use crate::plan::TypedValue;

/// The shared result map threaded through a plan execution. Owned by a
/// single execution; not safe to mutate from outside it.
pub type Context = OrderedMap<serde_json::Value>;

/// Whether invoking an action can change host state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutability {
    ReadOnly,
    Mutate,
}

/// The result of invoking an action handler.
pub type HandlerResult = Result<serde_json::Value, String>;

/// An action's invocable implementation: ordered, typed, positional
/// arguments plus the executor's shared context in, a JSON result or a
/// failure message out.
///
/// This is a callable registry without host reflection: rather than
/// introspecting a host-language function's signature, the host
/// supplies a closure alongside the parameter list that describes it.
/// A handler that ignores its context parameter simply never reads it.
pub type ActionHandler = Arc<dyn Fn(&[TypedValue], &Context) -> HandlerResult + Send + Sync>;

/// Registered description of one catalog action.
#[derive(Clone)]
pub struct ActionDescriptor {
    pub id: String,
    pub description: String,
    pub params: Vec<ParamDescriptor>,
    pub handler: ActionHandler,
    /// Key under which the executor stores this action's successful
    /// result in the shared context, if any.
    pub context_key: Option<String>,
    pub additional_context_keys: Vec<String>,
    pub mutability: Mutability,
}

impl fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("context_key", &self.context_key)
            .field("mutability", &self.mutability)
            .finish()
    }
}

/// The read-only view of a catalog that the parser and verifier need.
/// Kept as a trait here, in the foundation crate, so those components
/// don't have to depend on the concrete `Catalog` type that lives
/// alongside the resolver — avoids a cyclic crate dependency.
pub trait CatalogLookup {
    fn exists(&self, action_id: &str) -> bool;
    /// The action's declared parameter list, in authoritative order.
    fn params(&self, action_id: &str) -> Option<Vec<ParamDescriptor>>;
}

impl ActionDescriptor {
    pub fn builder(id: impl Into<String>) -> ActionBuilder {
        ActionBuilder::new(id)
    }

    /// Authoritative parameter order: declaration order, not the order
    /// arguments happened to appear in a parsed plan.
    pub fn parameter_order(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Fluent builder for [`ActionDescriptor`], the explicit-schema
/// registration path.
pub struct ActionBuilder {
    id: String,
    description: String,
    params: Vec<ParamDescriptor>,
    context_key: Option<String>,
    additional_context_keys: Vec<String>,
    mutability: Mutability,
}

impl ActionBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            params: Vec::new(),
            context_key: None,
            additional_context_keys: Vec::new(),
            mutability: Mutability::ReadOnly,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    pub fn context_key(mut self, key: impl Into<String>) -> Self {
        self.context_key = Some(key.into());
        self
    }

    pub fn additional_context_key(mut self, key: impl Into<String>) -> Self {
        self.additional_context_keys.push(key.into());
        self
    }

    pub fn mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = mutability;
        self
    }

    pub fn handler<F>(self, handler: F) -> ActionDescriptor
    where
        F: Fn(&[TypedValue], &Context) -> HandlerResult + Send + Sync + 'static,
    {
        ActionDescriptor {
            id: self.id,
            description: self.description,
            params: self.params,
            handler: Arc::new(handler),
            context_key: self.context_key,
            additional_context_keys: self.additional_context_keys,
            mutability: self.mutability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::TypeTag;

    #[test]
    fn builder_preserves_param_order() {
        let action = ActionDescriptor::builder("displayControlChart")
            .param(ParamDescriptor::new("measurementConcept", TypeTag::String))
            .param(ParamDescriptor::new("bundleId", TypeTag::String))
            .handler(|_args, _ctx| Ok(serde_json::Value::Null));

        assert_eq!(
            action.parameter_order(),
            vec!["measurementConcept", "bundleId"]
        );
    }
}
