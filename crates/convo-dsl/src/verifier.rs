//! The Plan Verifier: a pure, idempotent pass over a parsed [`Plan`]
//! that checks each action/pending step's shape against the catalog
//! and rewrites violations into `ErrorStep`s rather than rejecting the
//! whole plan.

use std::collections::HashSet;

use convo_types::{CatalogLookup, OrderedMap, PendingParam, Plan, Step, Value};

/// `verify(Plan, Catalog) -> Plan`. Idempotent: `verify(verify(p)) ==
/// verify(p)`, since a plan that already satisfies (a)-(c) is returned
/// with every step unchanged.
pub fn verify(plan: Plan, catalog: &dyn CatalogLookup) -> Plan {
    let steps = plan.steps().iter().cloned().map(|s| verify_step(s, catalog)).collect();
    Plan::new(plan.assistant_message, steps)
}

fn verify_step(step: Step, catalog: &dyn CatalogLookup) -> Step {
    match step {
        Step::Error { reason } => Step::Error { reason },
        Step::Action { description, action_id, arguments_by_name } => {
            verify_action(catalog, description, action_id, arguments_by_name, Vec::new())
        }
        Step::Pending { description, action_id, provided_params, pending_params } => {
            verify_action(catalog, description, action_id, provided_params, pending_params)
        }
    }
}

/// Checks (a) action id registered, (b) `providedParams`/pending names
/// are a subset of declared parameters, (c) provided ∪ pending equals
/// the full declared set — filling in any absent parameter as pending.
/// (a) and (b) violations demote the step to an `ErrorStep`; (c) is a
/// completion, not a violation.
fn verify_action(
    catalog: &dyn CatalogLookup,
    description: String,
    action_id: String,
    provided: OrderedMap<Value>,
    mut pending: Vec<PendingParam>,
) -> Step {
    let Some(declared) = catalog.params(&action_id) else {
        return Step::Error { reason: format!("unknown action: {action_id}") };
    };
    let declared_names: HashSet<&str> = declared.iter().map(|p| p.name.as_str()).collect();

    if let Some(unknown) = provided.keys().find(|k| !declared_names.contains(*k)) {
        return Step::Error { reason: format!("undeclared parameter '{unknown}' for action {action_id}") };
    }
    if let Some(unknown) = pending.iter().find(|p| !declared_names.contains(p.name.as_str())) {
        return Step::Error { reason: format!("undeclared parameter '{}' for action {action_id}", unknown.name) };
    }

    let already_named: HashSet<&str> = provided
        .keys()
        .chain(pending.iter().map(|p| p.name.as_str()))
        .collect();

    for param in &declared {
        if !already_named.contains(param.name.as_str()) {
            pending.push(PendingParam { name: param.name.clone(), message: param.pending_message() });
        }
    }

    if pending.is_empty() {
        Step::Action { description, action_id, arguments_by_name: provided }
    } else {
        Step::Pending { description, action_id, provided_params: provided, pending_params: pending }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_types::{ParamDescriptor, TypeTag};

    struct FakeCatalog;
    impl CatalogLookup for FakeCatalog {
        fn exists(&self, action_id: &str) -> bool {
            action_id == "runSqlQuery"
        }
        fn params(&self, action_id: &str) -> Option<Vec<ParamDescriptor>> {
            if action_id == "runSqlQuery" {
                Some(vec![
                    ParamDescriptor::new("query", TypeTag::String),
                    ParamDescriptor::new("limit", TypeTag::Int),
                ])
            } else {
                None
            }
        }
    }

    #[test]
    fn unknown_action_becomes_error() {
        let plan = Plan::new(
            "",
            vec![Step::Action { description: String::new(), action_id: "ghost".into(), arguments_by_name: OrderedMap::new() }],
        );
        let verified = verify(plan, &FakeCatalog);
        assert_eq!(verified.status(), convo_types::PlanStatus::Error);
    }

    #[test]
    fn undeclared_provided_param_becomes_error() {
        let mut args = OrderedMap::new();
        args.insert("bogus".to_string(), Value::String("x".into()));
        let plan = Plan::new(
            "",
            vec![Step::Action { description: String::new(), action_id: "runSqlQuery".into(), arguments_by_name: args }],
        );
        let verified = verify(plan, &FakeCatalog);
        assert_eq!(verified.status(), convo_types::PlanStatus::Error);
    }

    #[test]
    fn absent_declared_param_becomes_pending() {
        let mut args = OrderedMap::new();
        args.insert("query".to_string(), Value::String("SELECT 1".into()));
        let plan = Plan::new(
            "",
            vec![Step::Action { description: String::new(), action_id: "runSqlQuery".into(), arguments_by_name: args }],
        );
        let verified = verify(plan, &FakeCatalog);
        assert_eq!(verified.status(), convo_types::PlanStatus::Pending);
        assert_eq!(verified.pending_params()[0].name, "limit");
    }

    #[test]
    fn fully_satisfied_action_step_is_idempotent_under_verify() {
        let mut args = OrderedMap::new();
        args.insert("query".to_string(), Value::String("SELECT 1".into()));
        args.insert("limit".to_string(), Value::Int(10));
        let plan = Plan::new(
            "",
            vec![Step::Action { description: String::new(), action_id: "runSqlQuery".into(), arguments_by_name: args }],
        );
        let once = verify(plan, &FakeCatalog);
        let twice = verify(once.clone(), &FakeCatalog);
        assert_eq!(once.status(), convo_types::PlanStatus::Ready);
        assert_eq!(twice.status(), convo_types::PlanStatus::Ready);
    }

    #[test]
    fn error_steps_pass_through_unchanged() {
        let plan = Plan::new("", vec![Step::Error { reason: "nope".into() }]);
        let verified = verify(plan, &FakeCatalog);
        assert_eq!(verified.first_error_reason(), Some("nope"));
    }
}
