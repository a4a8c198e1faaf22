//! The Plan Executor: sequentially invokes resolved action handlers,
//! threading a shared context map through steps and emitting lifecycle
//! events for each invocation.

use chrono::Utc;
use convo_types::{Context, PlanStatus, ResolvedPlan, ResolvedStep};
use uuid::Uuid;

use crate::instrumentation::{EventKind, InstrumentationEmitter};

/// Per-step result, recorded regardless of whether the step ran.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    Succeeded { action_id: String, result: serde_json::Value },
    Failed { action_id: String, reason: String },
    NotExecuted { action_id: String, reason: String },
}

/// `execute(ResolvedPlan, Context?) -> ExecutionResult`.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub success: bool,
    pub context: Context,
    pub step_outcomes: Vec<StepOutcome>,
    pub not_executed_reason: Option<String>,
}

/// Hooks invoked on the pre-check paths.
pub struct ExecutorHooks<'a> {
    pub on_pending: Option<Box<dyn FnOnce(&[String]) + 'a>>,
    pub on_error: Option<Box<dyn FnOnce(&str) + 'a>>,
}

impl<'a> Default for ExecutorHooks<'a> {
    fn default() -> Self {
        Self { on_pending: None, on_error: None }
    }
}

/// Execute a READY plan, or short-circuit with `notExecuted` for
/// PENDING/ERROR plans.
pub fn execute(
    plan: &ResolvedPlan,
    initial_context: Context,
    emitter: &InstrumentationEmitter,
    hooks: ExecutorHooks<'_>,
) -> ExecutionResult {
    match plan.status() {
        PlanStatus::Pending => {
            let names = plan.pending_param_names();
            let reason = format!("awaiting: {}", names.join(", "));
            if let Some(on_pending) = hooks.on_pending {
                on_pending(&names);
            }
            return ExecutionResult {
                success: false,
                context: initial_context,
                step_outcomes: Vec::new(),
                not_executed_reason: Some(reason),
            };
        }
        PlanStatus::Error => {
            let reason = plan.first_error_reason().unwrap_or("unknown error").to_string();
            if let Some(on_error) = hooks.on_error {
                on_error(&reason);
            }
            return ExecutionResult {
                success: false,
                context: initial_context,
                step_outcomes: Vec::new(),
                not_executed_reason: Some(reason),
            };
        }
        PlanStatus::Ready => {}
    }

    let mut context = initial_context;
    let mut outcomes = Vec::with_capacity(plan.steps.len());
    let mut aborted = false;

    for step in &plan.steps {
        if aborted {
            let action_id = match step {
                ResolvedStep::Action { action_id, .. } => action_id.clone(),
                ResolvedStep::Pending { action_id, .. } => action_id.clone(),
                ResolvedStep::Error { .. } => "<error>".to_string(),
            };
            outcomes.push(StepOutcome::NotExecuted {
                action_id,
                reason: "aborted: a prior step failed".to_string(),
            });
            continue;
        }

        let ResolvedStep::Action { action_id, binding, context_key, additional_context_keys } = step else {
            // Pending/Error steps inside an overall-Ready plan cannot
            // occur: `ResolvedPlan::status` is Ready only when every
            // step is an Action.
            unreachable!("Ready plan contained a non-Action step");
        };

        let correlation_id = Uuid::new_v4();
        tracing::debug!(action_id, %correlation_id, "executing step");

        emitter.emit_requested(EventKind::Action, action_id.clone(), correlation_id);
        let start = Utc::now();
        emitter.emit_started(EventKind::Action, action_id.clone(), correlation_id);

        match (binding.handler)(&binding.ordered_args, &context) {
            Ok(result) => {
                let duration_ms = (Utc::now() - start).num_milliseconds();
                emitter.emit_succeeded(
                    EventKind::Action,
                    action_id.clone(),
                    correlation_id,
                    duration_ms,
                    Default::default(),
                );
                tracing::info!(action_id, duration_ms, "step succeeded");
                if let Some(key) = context_key {
                    context.insert(key.clone(), result.clone());
                }
                if let Some(obj) = result.as_object() {
                    for key in additional_context_keys {
                        if let Some(value) = obj.get(key) {
                            context.insert(key.clone(), value.clone());
                        }
                    }
                }
                outcomes.push(StepOutcome::Succeeded { action_id: action_id.clone(), result });
            }
            Err(reason) => {
                let duration_ms = (Utc::now() - start).num_milliseconds();
                emitter.emit_failed(
                    EventKind::Action,
                    action_id.clone(),
                    correlation_id,
                    duration_ms,
                    Default::default(),
                );
                tracing::warn!(action_id, %reason, "step failed");
                outcomes.push(StepOutcome::Failed { action_id: action_id.clone(), reason });
                aborted = true;
            }
        }
    }

    ExecutionResult { success: !aborted, context, step_outcomes: outcomes, not_executed_reason: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_types::{ActionDescriptor, OrderedMap, ParamDescriptor, PendingParam, Plan, TypeTag};

    use crate::catalog::Catalog;
    use crate::resolver::{resolve, TypeFactoryRegistry};

    fn ready_plan_with(handler_ok: bool, second_handler_ok: bool) -> ResolvedPlan {
        let mut catalog = Catalog::new();
        catalog
            .register(
                ActionDescriptor::builder("stepOne")
                    .param(ParamDescriptor::new("x", TypeTag::String))
                    .context_key("stepOne")
                    .handler(move |_args, _ctx| {
                        if handler_ok {
                            Ok(serde_json::json!("one"))
                        } else {
                            Err("boom".to_string())
                        }
                    }),
            )
            .unwrap();
        catalog
            .register(
                ActionDescriptor::builder("stepTwo")
                    .param(ParamDescriptor::new("x", TypeTag::String))
                    .handler(move |_args, ctx| {
                        assert!(ctx.get("stepOne").is_some(), "context from step one must be visible");
                        if second_handler_ok {
                            Ok(serde_json::json!("two"))
                        } else {
                            Err("boom2".to_string())
                        }
                    }),
            )
            .unwrap();

        let mut args1 = OrderedMap::new();
        args1.insert("x", convo_types::Value::String("a".into()));
        let mut args2 = OrderedMap::new();
        args2.insert("x", convo_types::Value::String("b".into()));

        let plan = Plan::new(
            "",
            vec![
                convo_types::Step::Action { description: String::new(), action_id: "stepOne".into(), arguments_by_name: args1 },
                convo_types::Step::Action { description: String::new(), action_id: "stepTwo".into(), arguments_by_name: args2 },
            ],
        );
        let factories = TypeFactoryRegistry::new();
        resolve(plan, &catalog, &factories)
    }

    #[test]
    fn executes_steps_in_order_threading_context() {
        let plan = ready_plan_with(true, true);
        let emitter = InstrumentationEmitter::new();
        let result = execute(&plan, Context::new(), &emitter, ExecutorHooks::default());

        assert!(result.success);
        assert_eq!(result.step_outcomes.len(), 2);
        assert_eq!(result.context.get("stepOne"), Some(&serde_json::json!("one")));
    }

    #[test]
    fn failure_aborts_remaining_steps() {
        let plan = ready_plan_with(false, true);
        let emitter = InstrumentationEmitter::new();
        let result = execute(&plan, Context::new(), &emitter, ExecutorHooks::default());

        assert!(!result.success);
        assert!(matches!(result.step_outcomes[0], StepOutcome::Failed { .. }));
        assert!(matches!(result.step_outcomes[1], StepOutcome::NotExecuted { .. }));
    }

    #[test]
    fn pending_plan_is_not_executed() {
        let plan = ResolvedPlan {
            assistant_message: String::new(),
            steps: vec![ResolvedStep::Pending {
                description: String::new(),
                action_id: "stepOne".into(),
                provided_params: OrderedMap::new(),
                pending_params: vec![PendingParam { name: "x".into(), message: "Provide x".into() }],
            }],
        };
        let emitter = InstrumentationEmitter::new();
        let result = execute(&plan, Context::new(), &emitter, ExecutorHooks::default());

        assert!(!result.success);
        assert_eq!(result.not_executed_reason.as_deref(), Some("awaiting: x"));
        assert!(result.step_outcomes.is_empty());
    }

    #[test]
    fn error_plan_is_not_executed() {
        let plan = ResolvedPlan {
            assistant_message: String::new(),
            steps: vec![ResolvedStep::Error { reason: "unknown action: ghost".into() }],
        };
        let emitter = InstrumentationEmitter::new();
        let result = execute(&plan, Context::new(), &emitter, ExecutorHooks::default());

        assert!(!result.success);
        assert_eq!(result.not_executed_reason.as_deref(), Some("unknown action: ghost"));
    }

    #[test]
    fn on_pending_hook_receives_pending_names() {
        let plan = ResolvedPlan {
            assistant_message: String::new(),
            steps: vec![ResolvedStep::Pending {
                description: String::new(),
                action_id: "stepOne".into(),
                provided_params: OrderedMap::new(),
                pending_params: vec![PendingParam { name: "x".into(), message: "Provide x".into() }],
            }],
        };
        let emitter = InstrumentationEmitter::new();
        let mut seen = None;
        let hooks = ExecutorHooks {
            on_pending: Some(Box::new(|names| seen = Some(names.to_vec()))),
            on_error: None,
        };
        execute(&plan, Context::new(), &emitter, hooks);
        assert_eq!(seen, Some(vec!["x".to_string()]));
    }
}
