//! End-to-end conversation scenarios, driven through the public
//! `ConversationManager` + resolver/executor surface rather than any
//! single module in isolation. Blob tamper and migration are already
//! exercised at the byte level in `blob.rs`'s own unit tests; this file
//! adds one end-to-end check of how a tampered blob behaves when handed
//! back through a real turn.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use convo_engine::{
    blob, execute, Catalog, ConversationManager, ContextRegistry, ExecutorHooks, Handle,
    InstrumentationEmitter, Planner, PlannerConfig, TypeFactoryRegistry,
};
use convo_types::{ActionDescriptor, ConversationState, ParamDescriptor, Plan, PlanStatus, TypeTag};

/// Replays a fixed queue of raw model responses through the real
/// parser/verifier pipeline, so these tests exercise exactly what
/// `LlmPlanner` would produce for a given response, without a network
/// call.
struct ScriptedPlanner {
    catalog: Arc<Catalog>,
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedPlanner {
    fn new(catalog: Arc<Catalog>, responses: Vec<&str>) -> Self {
        Self { catalog, responses: Mutex::new(responses.into_iter().map(String::from).collect()) }
    }
}

#[async_trait]
impl Planner for ScriptedPlanner {
    async fn plan(&self, _user_message: &str, _state: &ConversationState) -> Plan {
        let raw = self.responses.lock().unwrap().pop_front().expect("scripted response exhausted");
        convo_dsl::parse_and_verify(&raw, self.catalog.as_ref())
    }
}

fn control_chart_catalog() -> Arc<Catalog> {
    let mut catalog = Catalog::new();
    catalog
        .register(
            ActionDescriptor::builder("displayControlChart")
                .param(ParamDescriptor::new("measurementConcept", TypeTag::String))
                .param(ParamDescriptor::new("bundleId", TypeTag::String))
                .handler(|_args, _ctx| Ok(serde_json::json!({"rendered": true}))),
        )
        .unwrap();
    catalog
        .register(
            ActionDescriptor::builder("exportControlChartToExcel")
                .param(ParamDescriptor::new("measurementConcept", TypeTag::String))
                .param(ParamDescriptor::new("bundleId", TypeTag::String))
                .context_key("lastExport")
                .handler(|_args, _ctx| Ok(serde_json::json!({"file": "export.xlsx"}))),
        )
        .unwrap();
    Arc::new(catalog)
}

fn manager_for(planner: ScriptedPlanner) -> ConversationManager {
    ConversationManager::blob_backed(Arc::new(planner), PlannerConfig::default(), Arc::new(ContextRegistry::new()), None)
}

#[tokio::test]
async fn happy_path_resolves_and_executes_with_no_context_keys() {
    let catalog = control_chart_catalog();
    let planner = ScriptedPlanner::new(
        catalog.clone(),
        vec![r#"{"message":"","steps":[{"actionId":"displayControlChart","parameters":{"measurementConcept":"displacement","bundleId":"A12345"}}]}"#],
    );
    let manager = manager_for(planner);

    let turn = manager
        .converse("show me the displacement chart for A12345", Handle::Blob(Vec::new()))
        .await
        .unwrap();

    assert_eq!(turn.plan.status(), PlanStatus::Ready);

    let factories = TypeFactoryRegistry::new();
    let resolved = convo_engine::resolve(turn.plan, catalog.as_ref(), &factories);
    let emitter = InstrumentationEmitter::new();
    let result = execute(&resolved, convo_types::Context::new(), &emitter, ExecutorHooks::default());

    assert!(result.success);
    assert!(result.context.is_empty(), "no contextKey was declared on this action");
}

#[tokio::test]
async fn pending_then_followup_merges_provided_params_across_turns() {
    let catalog = control_chart_catalog();
    let planner = ScriptedPlanner::new(
        catalog.clone(),
        vec![
            r#"{"message":"","steps":[{"actionId":"exportControlChartToExcel","parameters":{"measurementConcept":"displacement"}}]}"#,
            r#"{"message":"","steps":[{"actionId":"exportControlChartToExcel","parameters":{"measurementConcept":"displacement","bundleId":"A12345"}}]}"#,
        ],
    );
    let manager = manager_for(planner);

    let turn1 = manager
        .converse("export a control chart to excel for displacement values", Handle::Blob(Vec::new()))
        .await
        .unwrap();

    assert_eq!(turn1.plan.status(), PlanStatus::Pending);
    assert_eq!(turn1.pending_params.len(), 1);
    assert_eq!(turn1.pending_params[0].name, "bundleId");
    assert_eq!(turn1.pending_params[0].message, "Provide bundleId");
    assert_eq!(
        turn1.state.provided_params.get("measurementConcept"),
        Some(&convo_types::Value::String("displacement".to_string()))
    );

    let turn2 = manager
        .converse("the bundle id is A12345", Handle::Blob(turn1.blob.unwrap()))
        .await
        .unwrap();

    assert_eq!(turn2.plan.status(), PlanStatus::Ready);
    match &turn2.plan.steps()[0] {
        convo_types::Step::Action { arguments_by_name, .. } => {
            assert_eq!(arguments_by_name.get("measurementConcept"), Some(&convo_types::Value::String("displacement".into())));
            assert_eq!(arguments_by_name.get("bundleId"), Some(&convo_types::Value::String("A12345".into())));
        }
        other => panic!("expected a ready Action step, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_action_becomes_error_but_state_still_advances() {
    let catalog = control_chart_catalog();
    let planner = ScriptedPlanner::new(
        catalog,
        vec![r#"{"message":"","steps":[{"actionId":"doTheThing","parameters":{}}]}"#],
    );
    let manager = manager_for(planner);

    let turn = manager.converse("do the thing", Handle::Blob(Vec::new())).await.unwrap();

    assert_eq!(turn.plan.status(), PlanStatus::Error);
    assert!(turn.plan.first_error_reason().unwrap().contains("unknown action"));
    assert_eq!(turn.state.latest_user_message.as_deref(), Some("do the thing"));
}

#[tokio::test]
async fn malformed_response_becomes_error_step_and_the_next_turn_still_works() {
    let catalog = control_chart_catalog();
    let planner = ScriptedPlanner::new(
        catalog.clone(),
        vec![
            "I'm sorry, I can't help with that.",
            r#"{"message":"","steps":[{"actionId":"displayControlChart","parameters":{"measurementConcept":"displacement","bundleId":"A12345"}}]}"#,
        ],
    );
    let manager = manager_for(planner);

    let turn1 = manager.converse("???", Handle::Blob(Vec::new())).await.unwrap();
    assert_eq!(turn1.plan.status(), PlanStatus::Error);
    let reason = turn1.plan.first_error_reason().unwrap();
    assert!(reason.starts_with("Failed to parse plan:"));
    assert!(reason.len() <= 900);

    let turn2 = manager
        .converse("show me the chart after all", Handle::Blob(turn1.blob.unwrap()))
        .await
        .unwrap();
    assert_eq!(turn2.plan.status(), PlanStatus::Ready);
}

#[tokio::test]
async fn tampered_blob_handed_to_converse_rejects_the_turn() {
    let catalog = control_chart_catalog();
    let planner = ScriptedPlanner::new(
        catalog,
        vec![r#"{"message":"","steps":[]}"#, r#"{"message":"","steps":[]}"#],
    );
    let manager = manager_for(planner);

    let turn1 = manager.converse("hello", Handle::Blob(Vec::new())).await.unwrap();
    let mut tampered = turn1.blob.unwrap();
    let last = tampered.len() - 1;
    tampered[last] ^= 0xFF;

    assert!(blob::deserialize(&tampered, None).is_err());

    // A tampered blob must fail the turn outright, not be silently
    // treated as "no prior state".
    let err = manager.converse("hello again", Handle::Blob(tampered)).await.unwrap_err();
    assert!(matches!(err, convo_engine::ConverseError::Blob(_)));
}
