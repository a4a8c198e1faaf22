//! The primary (JSON) plan wire format.

use convo_types::{CatalogLookup, OrderedMap, PendingParam, Plan, Step, Value};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct JsonPlan {
    #[serde(default)]
    message: String,
    #[serde(default)]
    steps: Vec<JsonStep>,
}

#[derive(Debug, Deserialize)]
struct JsonStep {
    #[serde(rename = "actionId")]
    action_id: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameters: serde_json::Map<String, serde_json::Value>,
}

/// Parse a JSON-format plan body against the catalog, producing a
/// `Plan` per the per-step completion algorithm below.
pub fn parse(body: &str, catalog: &dyn CatalogLookup) -> Result<Plan, String> {
    let parsed: JsonPlan =
        serde_json::from_str(body).map_err(|e| format!("invalid plan JSON: {e}"))?;

    let steps = parsed
        .steps
        .into_iter()
        .map(|s| build_step(s, catalog))
        .collect();

    Ok(Plan::new(parsed.message, steps))
}

fn build_step(json_step: JsonStep, catalog: &dyn CatalogLookup) -> Step {
    let Some(declared) = catalog.params(&json_step.action_id) else {
        return Step::Error { reason: format!("unknown action: {}", json_step.action_id) };
    };

    let mut provided = OrderedMap::new();
    let mut pending = Vec::new();

    for param in &declared {
        match json_step.parameters.get(&param.name) {
            // Missing or explicit null ⇒ pending.
            None => pending.push(PendingParam { name: param.name.clone(), message: param.pending_message() }),
            Some(serde_json::Value::Null) => {
                pending.push(PendingParam { name: param.name.clone(), message: param.pending_message() })
            }
            Some(v) => provided.insert(param.name.clone(), Value::from_json(v.clone())),
        }
    }
    // Extra keys in `parameters` not in `declared` are lenient —
    // simply never looked at.

    if pending.is_empty() {
        Step::Action {
            description: json_step.description,
            action_id: json_step.action_id,
            arguments_by_name: provided,
        }
    } else {
        Step::Pending {
            description: json_step.description,
            action_id: json_step.action_id,
            provided_params: provided,
            pending_params: pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_types::{ParamDescriptor, TypeTag};

    struct FakeCatalog;
    impl CatalogLookup for FakeCatalog {
        fn exists(&self, action_id: &str) -> bool {
            action_id == "displayControlChart" || action_id == "exportControlChartToExcel"
        }
        fn params(&self, action_id: &str) -> Option<Vec<ParamDescriptor>> {
            match action_id {
                "displayControlChart" => Some(vec![
                    ParamDescriptor::new("measurementConcept", TypeTag::String),
                    ParamDescriptor::new("bundleId", TypeTag::String),
                ]),
                "exportControlChartToExcel" => Some(vec![
                    ParamDescriptor::new("measurementConcept", TypeTag::String),
                    ParamDescriptor::new("bundleId", TypeTag::String),
                ]),
                _ => None,
            }
        }
    }

    #[test]
    fn s1_happy_path_produces_ready_action_step() {
        let body = r#"{"message":"","steps":[{"actionId":"displayControlChart","parameters":{"measurementConcept":"displacement","bundleId":"A12345"}}]}"#;
        let plan = parse(body, &FakeCatalog).unwrap();
        assert_eq!(plan.status(), convo_types::PlanStatus::Ready);
        match &plan.steps()[0] {
            Step::Action { arguments_by_name, .. } => {
                assert_eq!(arguments_by_name.get("measurementConcept"), Some(&Value::String("displacement".into())));
                assert_eq!(arguments_by_name.get("bundleId"), Some(&Value::String("A12345".into())));
            }
            other => panic!("expected Action step, got {other:?}"),
        }
    }

    #[test]
    fn s2_missing_param_becomes_pending() {
        let body = r#"{"message":"","steps":[{"actionId":"exportControlChartToExcel","parameters":{"measurementConcept":"displacement"}}]}"#;
        let plan = parse(body, &FakeCatalog).unwrap();
        assert_eq!(plan.status(), convo_types::PlanStatus::Pending);
        let pending = plan.pending_params();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "bundleId");
        assert_eq!(pending[0].message, "Provide bundleId");
    }

    #[test]
    fn s3_unknown_action_becomes_error_step() {
        let body = r#"{"message":"","steps":[{"actionId":"doTheThing","parameters":{}}]}"#;
        let plan = parse(body, &FakeCatalog).unwrap();
        assert_eq!(plan.status(), convo_types::PlanStatus::Error);
        assert!(plan.first_error_reason().unwrap().contains("unknown action"));
    }

    #[test]
    fn extra_unknown_parameter_keys_are_ignored() {
        let body = r#"{"message":"","steps":[{"actionId":"displayControlChart","parameters":{"measurementConcept":"displacement","bundleId":"A1","extra":"ignored"}}]}"#;
        let plan = parse(body, &FakeCatalog).unwrap();
        assert_eq!(plan.status(), convo_types::PlanStatus::Ready);
    }
}
