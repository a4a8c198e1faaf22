//! The Plan Model: an immutable plan made of an assistant message and
//! ordered steps, plus the resolved form produced by the resolver.

use serde::{Deserialize, Serialize};

use crate::action::ActionHandler;
use crate::collections::OrderedMap;
use crate::value::Value;

/// A still-missing parameter, carried on a `PendingActionStep`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingParam {
    pub name: String,
    pub message: String,
}

/// One step of a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Step {
    /// All required parameters are present.
    Action {
        description: String,
        action_id: String,
        arguments_by_name: OrderedMap<Value>,
    },
    /// At least one required parameter is still missing.
    Pending {
        description: String,
        action_id: String,
        provided_params: OrderedMap<Value>,
        pending_params: Vec<PendingParam>,
    },
    /// The planner declared inability to satisfy the request.
    Error { reason: String },
}

impl Step {
    pub fn pending_params(&self) -> &[PendingParam] {
        match self {
            Step::Pending { pending_params, .. } => pending_params,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Step::Error { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Step::Pending { .. })
    }
}

/// Derived overall status of a [`Plan`] or [`ResolvedPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Ready,
    Pending,
    Error,
}

fn derive_status(steps: &[Step]) -> PlanStatus {
    if steps.is_empty() {
        return PlanStatus::Error;
    }
    if steps.iter().any(Step::is_pending) {
        return PlanStatus::Pending;
    }
    if steps.iter().any(Step::is_error) {
        return PlanStatus::Error;
    }
    PlanStatus::Ready
}

/// An immutable plan: an assistant-facing message plus ordered steps.
///
/// Constructors deep-copy their inputs implicitly, since `Step` and its
/// fields are all owned, `Clone` data with no shared interior mutability
/// — there is no way to mutate a `Plan` after construction without
/// replacing it outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub assistant_message: String,
    steps: Vec<Step>,
}

impl Plan {
    pub fn new(assistant_message: impl Into<String>, steps: Vec<Step>) -> Self {
        Self { assistant_message: assistant_message.into(), steps }
    }

    pub fn single_error(reason: impl Into<String>) -> Self {
        Self::new(String::new(), vec![Step::Error { reason: reason.into() }])
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn status(&self) -> PlanStatus {
        derive_status(&self.steps)
    }

    /// Union, in step order, of every pending step's pending params.
    /// No de-duplication is performed — see DESIGN.md.
    pub fn pending_params(&self) -> Vec<PendingParam> {
        self.steps.iter().flat_map(Step::pending_params).cloned().collect()
    }

    /// The first step's provided params, if it is a `Pending` step —
    /// used by the Conversation Manager to find what a reply just
    /// supplied.
    pub fn first_step_newly_provided(&self) -> OrderedMap<Value> {
        match self.steps.first() {
            Some(Step::Pending { provided_params, .. }) => provided_params.clone(),
            _ => OrderedMap::new(),
        }
    }

    /// The reason of the first error step, if any (used when surfacing
    /// a plan-level failure on the "not executed" path).
    pub fn first_error_reason(&self) -> Option<&str> {
        self.steps.iter().find_map(|s| match s {
            Step::Error { reason } => Some(reason.as_str()),
            _ => None,
        })
    }
}

/// A typed, resolver-coerced argument value.
#[derive(Debug, Clone)]
pub enum TypedValue {
    String(String),
    Int(i64),
    Bool(bool),
    Float(f64),
    List(Vec<TypedValue>),
    /// Output of a `TypeFactory` for a `Nested` parameter — kept as
    /// arbitrary JSON since the factory's concrete payload type is
    /// host-defined.
    Nested(serde_json::Value),
}

/// The pairing of a resolved action step to its invocable handler and
/// ordered, typed arguments.
#[derive(Clone)]
pub struct Binding {
    pub handler: ActionHandler,
    pub ordered_args: Vec<TypedValue>,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("ordered_args", &self.ordered_args)
            .finish()
    }
}

/// One step of a [`ResolvedPlan`]: action steps carry a computed
/// [`Binding`]; pending/error steps pass through unchanged.
#[derive(Debug, Clone)]
pub enum ResolvedStep {
    Action {
        description: String,
        action_id: String,
        binding: Binding,
        /// Mirrors the action descriptor's `contextKey` /
        /// `additionalContextKeys` so the executor can apply the
        /// context-write step without a back-reference to the catalog.
        context_key: Option<String>,
        additional_context_keys: Vec<String>,
    },
    Pending {
        description: String,
        action_id: String,
        provided_params: OrderedMap<Value>,
        pending_params: Vec<PendingParam>,
    },
    Error {
        reason: String,
    },
}

impl ResolvedStep {
    pub fn is_error(&self) -> bool {
        matches!(self, ResolvedStep::Error { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ResolvedStep::Pending { .. })
    }
}

/// Same shape as [`Plan`] but every action step now carries a
/// [`Binding`].
#[derive(Debug, Clone)]
pub struct ResolvedPlan {
    pub assistant_message: String,
    pub steps: Vec<ResolvedStep>,
}

impl ResolvedPlan {
    pub fn status(&self) -> PlanStatus {
        if self.steps.is_empty() {
            return PlanStatus::Error;
        }
        if self.steps.iter().any(ResolvedStep::is_pending) {
            return PlanStatus::Pending;
        }
        if self.steps.iter().any(ResolvedStep::is_error) {
            return PlanStatus::Error;
        }
        PlanStatus::Ready
    }

    pub fn pending_param_names(&self) -> Vec<String> {
        self.steps
            .iter()
            .flat_map(|s| match s {
                ResolvedStep::Pending { pending_params, .. } => {
                    pending_params.iter().map(|p| p.name.clone()).collect::<Vec<_>>()
                }
                _ => Vec::new(),
            })
            .collect()
    }

    pub fn first_error_reason(&self) -> Option<&str> {
        self.steps.iter().find_map(|s| match s {
            ResolvedStep::Error { reason } => Some(reason.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_step(name: &str) -> Step {
        Step::Action {
            description: String::new(),
            action_id: name.to_string(),
            arguments_by_name: OrderedMap::new(),
        }
    }

    fn pending_step(name: &str) -> Step {
        Step::Pending {
            description: String::new(),
            action_id: name.to_string(),
            provided_params: OrderedMap::new(),
            pending_params: vec![PendingParam { name: "x".into(), message: "Provide x".into() }],
        }
    }

    fn error_step(reason: &str) -> Step {
        Step::Error { reason: reason.to_string() }
    }

    #[test]
    fn empty_steps_is_error() {
        let plan = Plan::new("", vec![]);
        assert_eq!(plan.status(), PlanStatus::Error);
    }

    #[test]
    fn all_action_steps_is_ready() {
        let plan = Plan::new("", vec![action_step("a"), action_step("b")]);
        assert_eq!(plan.status(), PlanStatus::Ready);
    }

    #[test]
    fn any_pending_step_is_pending_even_with_errors() {
        let plan = Plan::new("", vec![error_step("bad"), pending_step("a")]);
        assert_eq!(plan.status(), PlanStatus::Pending);
    }

    #[test]
    fn error_without_pending_is_error() {
        let plan = Plan::new("", vec![action_step("a"), error_step("bad")]);
        assert_eq!(plan.status(), PlanStatus::Error);
    }

    #[test]
    fn pending_params_concatenate_in_step_order_without_dedup() {
        let plan = Plan::new("", vec![pending_step("a"), pending_step("b")]);
        // Open question (a): concatenation, not de-duplication.
        assert_eq!(plan.pending_params().len(), 2);
    }
}
