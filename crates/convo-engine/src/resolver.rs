//! The Plan Resolver: binds a verified `Plan` to invocable handlers,
//! coercing argument values to declared parameter types.

use std::collections::HashMap;

use convo_types::{Binding, CatalogLookup, Plan, PlanStatus, ResolutionError, ResolvedPlan, ResolvedStep, Step, TypeTag, TypedValue, Value};

use crate::catalog::Catalog;

/// Builds a typed payload for a `Nested` parameter from its raw
/// untyped value. Registered per `nestedSchemaTag`.
pub trait TypeFactory: Send + Sync {
    fn build(&self, raw: &Value) -> Result<serde_json::Value, String>;
}

/// A registry of `TypeFactory` implementations keyed by the schema tag
/// named on a `Nested` parameter's descriptor.
#[derive(Default)]
pub struct TypeFactoryRegistry {
    factories: HashMap<String, Box<dyn TypeFactory>>,
}

impl TypeFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema_tag: impl Into<String>, factory: Box<dyn TypeFactory>) {
        self.factories.insert(schema_tag.into(), factory);
    }

    fn get(&self, schema_tag: &str) -> Option<&dyn TypeFactory> {
        self.factories.get(schema_tag).map(|b| b.as_ref())
    }
}

/// `resolve(Plan, Catalog) -> ResolvedPlan`. Pending/Error steps pass
/// through unchanged; Action steps are coerced to a `Binding` or
/// demoted to `ErrorStep` on coercion failure.
pub fn resolve(plan: Plan, catalog: &Catalog, factories: &TypeFactoryRegistry) -> ResolvedPlan {
    let steps = plan
        .steps()
        .iter()
        .cloned()
        .map(|s| resolve_step(s, catalog, factories))
        .collect();

    ResolvedPlan { assistant_message: plan.assistant_message, steps }
}

fn resolve_step(step: Step, catalog: &Catalog, factories: &TypeFactoryRegistry) -> ResolvedStep {
    match step {
        Step::Error { reason } => ResolvedStep::Error { reason },
        Step::Pending { description, action_id, provided_params, pending_params } => {
            ResolvedStep::Pending { description, action_id, provided_params, pending_params }
        }
        Step::Action { description, action_id, arguments_by_name } => {
            let Some(action) = catalog.by_id(&action_id) else {
                return ResolvedStep::Error { reason: format!("unknown action: {action_id}") };
            };

            let mut ordered_args = Vec::with_capacity(action.params.len());
            for param in &action.params {
                let raw = arguments_by_name.get(&param.name).cloned().unwrap_or(Value::Null);
                match coerce(&raw, &param.type_tag, param.allowed_pattern.as_deref(), factories) {
                    Ok(typed) => ordered_args.push(typed),
                    Err(_) => {
                        return ResolvedStep::Error { reason: format!("invalid value for {}", param.name) }
                    }
                }
            }

            ResolvedStep::Action {
                description,
                action_id,
                binding: Binding { handler: action.handler.clone(), ordered_args },
                context_key: action.context_key.clone(),
                additional_context_keys: action.additional_context_keys.clone(),
            }
        }
    }
}

fn coerce(
    raw: &Value,
    type_tag: &TypeTag,
    allowed_pattern: Option<&str>,
    factories: &TypeFactoryRegistry,
) -> Result<TypedValue, String> {
    match type_tag {
        TypeTag::String => {
            let s = match raw {
                Value::String(s) => s.clone(),
                Value::Int(i) => i.to_string(),
                Value::Float(f) => f.to_string(),
                Value::Bool(b) => b.to_string(),
                other => return Err(format!("cannot coerce {other:?} to string")),
            };
            check_pattern(&s, allowed_pattern)?;
            Ok(TypedValue::String(s))
        }
        TypeTag::Int => {
            let i = match raw {
                Value::Int(i) => *i,
                Value::String(s) => s.parse::<i64>().map_err(|e| e.to_string())?,
                other => return Err(format!("cannot coerce {other:?} to int")),
            };
            check_pattern(&i.to_string(), allowed_pattern)?;
            Ok(TypedValue::Int(i))
        }
        TypeTag::Bool => match raw {
            Value::Bool(b) => Ok(TypedValue::Bool(*b)),
            Value::String(s) if s == "true" || s == "false" => Ok(TypedValue::Bool(s == "true")),
            other => Err(format!("cannot coerce {other:?} to bool")),
        },
        TypeTag::Float => {
            let f = match raw {
                Value::Float(f) => *f,
                Value::Int(i) => *i as f64,
                Value::String(s) => s.parse::<f64>().map_err(|e| e.to_string())?,
                other => return Err(format!("cannot coerce {other:?} to float")),
            };
            check_pattern(&f.to_string(), allowed_pattern)?;
            Ok(TypedValue::Float(f))
        }
        TypeTag::List(inner) => match raw {
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(coerce(item, inner, allowed_pattern, factories)?);
                }
                Ok(TypedValue::List(out))
            }
            other => Err(format!("cannot coerce {other:?} to list")),
        },
        TypeTag::Nested(schema_tag) => {
            let factory = factories
                .get(schema_tag)
                .ok_or_else(|| format!("no TypeFactory registered for schema '{schema_tag}'"))?;
            factory.build(raw).map(TypedValue::Nested)
        }
    }
}

fn check_pattern(rendered: &str, allowed_pattern: Option<&str>) -> Result<(), String> {
    let Some(pattern) = allowed_pattern else { return Ok(()) };
    let re = regex::Regex::new(pattern).map_err(|e| e.to_string())?;
    if re.is_match(rendered) {
        Ok(())
    } else {
        Err(format!("value '{rendered}' does not match pattern '{pattern}'"))
    }
}

/// Overall status recomputation after resolution: status may demote
/// READY → ERROR on coercion failure. `ResolvedPlan::status()` already
/// implements this derivation; this helper exists for callers that
/// want to assert the specific demotion without re-deriving.
pub fn demoted_to_error(plan: &ResolvedPlan) -> bool {
    plan.status() == PlanStatus::Error
}

/// Resolve a plan and require the result be `Ready`, for callers that
/// want a hard error rather than inspecting `ResolvedPlan::status()`
/// themselves before handing the plan to the executor.
pub fn resolve_ready(plan: Plan, catalog: &Catalog, factories: &TypeFactoryRegistry) -> Result<ResolvedPlan, ResolutionError> {
    let resolved = resolve(plan, catalog, factories);
    match resolved.status() {
        PlanStatus::Ready => Ok(resolved),
        PlanStatus::Pending => Err(ResolutionError::NotReady { status: "Pending" }),
        PlanStatus::Error => Err(ResolutionError::NotReady { status: "Error" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_types::{ActionDescriptor, OrderedMap, ParamDescriptor};

    fn catalog_with_sql_action() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .register(
                ActionDescriptor::builder("runSqlQuery")
                    .param(ParamDescriptor::new("query", TypeTag::String).with_pattern("^SELECT.*"))
                    .param(ParamDescriptor::new("limit", TypeTag::Int))
                    .handler(|_args, _ctx| Ok(serde_json::Value::Bool(true))),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn resolves_primitive_action_step_to_binding() {
        let catalog = catalog_with_sql_action();
        let factories = TypeFactoryRegistry::new();
        let mut args = OrderedMap::new();
        args.insert("query".to_string(), Value::String("SELECT 1".into()));
        args.insert("limit".to_string(), Value::Int(10));
        let plan = Plan::new("", vec![Step::Action { description: String::new(), action_id: "runSqlQuery".into(), arguments_by_name: args }]);

        let resolved = resolve(plan, &catalog, &factories);
        assert_eq!(resolved.status(), PlanStatus::Ready);
        match &resolved.steps[0] {
            ResolvedStep::Action { binding, .. } => assert_eq!(binding.ordered_args.len(), 2),
            other => panic!("expected Action, got {other:?}"),
        }
    }

    #[test]
    fn pattern_mismatch_demotes_to_error_step() {
        let catalog = catalog_with_sql_action();
        let factories = TypeFactoryRegistry::new();
        let mut args = OrderedMap::new();
        args.insert("query".to_string(), Value::String("DROP TABLE users".into()));
        args.insert("limit".to_string(), Value::Int(10));
        let plan = Plan::new("", vec![Step::Action { description: String::new(), action_id: "runSqlQuery".into(), arguments_by_name: args }]);

        let resolved = resolve(plan, &catalog, &factories);
        assert_eq!(resolved.status(), PlanStatus::Error);
        assert!(resolved.first_error_reason().unwrap().contains("query"));
    }

    #[test]
    fn resolve_ready_rejects_a_pending_plan() {
        let catalog = catalog_with_sql_action();
        let factories = TypeFactoryRegistry::new();
        let plan = Plan::new(
            "",
            vec![Step::Pending {
                description: String::new(),
                action_id: "runSqlQuery".into(),
                provided_params: OrderedMap::new(),
                pending_params: vec![convo_types::PendingParam { name: "query".into(), message: "Provide query".into() }],
            }],
        );
        let err = resolve_ready(plan, &catalog, &factories).unwrap_err();
        assert!(matches!(err, ResolutionError::NotReady { status: "Pending" }));
    }

    #[test]
    fn pending_step_passes_through_unchanged() {
        let catalog = catalog_with_sql_action();
        let factories = TypeFactoryRegistry::new();
        let plan = Plan::new(
            "",
            vec![Step::Pending {
                description: String::new(),
                action_id: "runSqlQuery".into(),
                provided_params: OrderedMap::new(),
                pending_params: vec![convo_types::PendingParam { name: "query".into(), message: "Provide query".into() }],
            }],
        );
        let resolved = resolve(plan, &catalog, &factories);
        assert_eq!(resolved.status(), PlanStatus::Pending);
    }

    struct UppercaseFactory;
    impl TypeFactory for UppercaseFactory {
        fn build(&self, raw: &Value) -> Result<serde_json::Value, String> {
            match raw {
                Value::String(s) => Ok(serde_json::Value::String(s.to_uppercase())),
                other => Err(format!("expected string, got {other:?}")),
            }
        }
    }

    #[test]
    fn nested_schema_tag_delegates_to_registered_type_factory() {
        let mut catalog = Catalog::new();
        catalog
            .register(
                ActionDescriptor::builder("runFilter")
                    .param(ParamDescriptor::new("filter", TypeTag::nested("Upper")))
                    .handler(|_args, _ctx| Ok(serde_json::Value::Null)),
            )
            .unwrap();
        let mut factories = TypeFactoryRegistry::new();
        factories.register("Upper", Box::new(UppercaseFactory));

        let mut args = OrderedMap::new();
        args.insert("filter".to_string(), Value::String("hello".into()));
        let plan = Plan::new("", vec![Step::Action { description: String::new(), action_id: "runFilter".into(), arguments_by_name: args }]);

        let resolved = resolve(plan, &catalog, &factories);
        assert_eq!(resolved.status(), PlanStatus::Ready);
        match &resolved.steps[0] {
            ResolvedStep::Action { binding, .. } => match &binding.ordered_args[0] {
                TypedValue::Nested(v) => assert_eq!(v, &serde_json::Value::String("HELLO".into())),
                other => panic!("expected Nested, got {other:?}"),
            },
            other => panic!("expected Action, got {other:?}"),
        }
    }
}
