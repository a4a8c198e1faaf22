//! The Conversation Manager: the per-turn orchestrator tying together
//! the planner, the merge algorithm, persistence, and working-context
//! augmentation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use convo_types::{ConversationState, OrderedMap, PendingParam, Plan, Value, WrongMode};

use crate::blob;
use crate::blob::MigrationRegistry;
use crate::config::PlannerConfig;
use crate::context_registry::ContextRegistry;
use crate::planner::Planner;

/// External durable storage for store-mode sessions; load/save must
/// be atomic per session id.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self, session_id: &str) -> Option<ConversationState>;
    async fn save(&self, session_id: &str, state: ConversationState);
}

/// The handle a caller passes to `converse` — exactly one persistence
/// mode per manager instance.
pub enum Handle {
    Session(String),
    Blob(Vec<u8>),
}

enum Mode {
    Store(Arc<dyn StateStore>),
    Blob(Option<MigrationRegistry>),
}

/// Failure before a turn can even reach the planner: a handle/mode
/// mismatch, or a blob that fails integrity or migration. Either way
/// the caller's prior state is never silently discarded.
#[derive(Debug, thiserror::Error)]
pub enum ConverseError {
    #[error(transparent)]
    WrongMode(#[from] WrongMode),
    #[error(transparent)]
    Blob(#[from] blob::BlobError),
}

/// The per-turn result.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub plan: Plan,
    pub state: ConversationState,
    pub pending_params: Vec<PendingParam>,
    pub newly_provided: OrderedMap<Value>,
    pub blob: Option<Vec<u8>>,
}

pub struct ConversationManager {
    mode: Mode,
    planner: Arc<dyn Planner>,
    config: PlannerConfig,
    context_registry: Arc<ContextRegistry>,
}

impl ConversationManager {
    pub fn store_backed(
        store: Arc<dyn StateStore>,
        planner: Arc<dyn Planner>,
        config: PlannerConfig,
        context_registry: Arc<ContextRegistry>,
    ) -> Self {
        Self { mode: Mode::Store(store), planner, config, context_registry }
    }

    pub fn blob_backed(
        planner: Arc<dyn Planner>,
        config: PlannerConfig,
        context_registry: Arc<ContextRegistry>,
        migrations: Option<MigrationRegistry>,
    ) -> Self {
        Self { mode: Mode::Blob(migrations), planner, config, context_registry }
    }

    /// `converse(userMessage, handle) -> TurnResult`, without a
    /// model-call timeout.
    pub async fn converse(&self, user_message: &str, handle: Handle) -> Result<TurnResult, ConverseError> {
        self.converse_with_timeout(user_message, handle, None).await
    }

    /// Same as [`Self::converse`], aborting the model invocation after
    /// `timeout` if supplied.
    pub async fn converse_with_timeout(
        &self,
        user_message: &str,
        handle: Handle,
        timeout: Option<Duration>,
    ) -> Result<TurnResult, ConverseError> {
        let prior = self.load(&handle).await?;

        // Step 1: load or initialize, then fold the new message in.
        let mut state = match prior {
            Some(mut s) => {
                s.latest_user_message = Some(user_message.to_string());
                s
            }
            None => ConversationState::initial(user_message),
        };

        let effective_message = self.augment(user_message, &state);

        // Step 2: invoke the planner.
        let plan = match timeout {
            Some(duration) => match tokio::time::timeout(duration, self.planner.plan(&effective_message, &state)).await {
                Ok(plan) => plan,
                Err(_) => Plan::single_error("model invocation cancelled|timed out"),
            },
            None => self.planner.plan(&effective_message, &state).await,
        };

        // Step 3: extract pending / newly-provided.
        let pending = plan.pending_params();
        let newly_provided = plan.first_step_newly_provided();

        // Step 4: merge, dropping blank keys or nil values from the
        // incoming side.
        let mut merged_provided = state.provided_params.clone();
        for (key, value) in newly_provided.iter() {
            if key.trim().is_empty() || matches!(value, Value::Null) {
                continue;
            }
            merged_provided.insert(key.to_string(), value.clone());
        }

        // Step 5: construct the next state.
        state.pending_params = pending.clone();
        state.provided_params = merged_provided;
        state.latest_user_message = Some(user_message.to_string());
        let next_state = state.with_history_bound(self.config.max_history_size);
        next_state.check_invariants().expect("merge algorithm must keep provided/pending params disjoint and non-null");

        // Step 6: persist.
        let blob_out = self.persist(&handle, &next_state).await;

        Ok(TurnResult {
            plan,
            state: next_state,
            pending_params: pending,
            newly_provided,
            blob: blob_out,
        })
    }

    /// `expire()`: never touches the store.
    pub fn expire(&self) -> TurnResult {
        let state = ConversationState::empty();
        let migrations = match &self.mode {
            Mode::Blob(m) => m.as_ref(),
            Mode::Store(_) => None,
        };
        let blob_out = blob::serialize(&state, migrations);

        TurnResult {
            plan: Plan::new("Session expired", Vec::new()),
            state,
            pending_params: Vec::new(),
            newly_provided: OrderedMap::new(),
            blob: Some(blob_out),
        }
    }

    async fn load(&self, handle: &Handle) -> Result<Option<ConversationState>, ConverseError> {
        match (&self.mode, handle) {
            (Mode::Store(store), Handle::Session(session_id)) => Ok(store.load(session_id).await),
            (Mode::Blob(migrations), Handle::Blob(bytes)) => {
                if bytes.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(blob::deserialize(bytes, migrations.as_ref())?))
                }
            }
            (Mode::Store(_), Handle::Blob(_)) => Err(WrongMode::ExpectedStore.into()),
            (Mode::Blob(_), Handle::Session(_)) => Err(WrongMode::ExpectedBlob.into()),
        }
    }

    async fn persist(&self, handle: &Handle, state: &ConversationState) -> Option<Vec<u8>> {
        match (&self.mode, handle) {
            (Mode::Store(store), Handle::Session(session_id)) => {
                store.save(session_id, state.clone()).await;
                None
            }
            (Mode::Blob(migrations), Handle::Blob(_)) => Some(blob::serialize(state, migrations.as_ref())),
            // `load` above already rejected any mode/handle mismatch.
            _ => unreachable!("handle already validated against mode"),
        }
    }

    /// Working-context augmentation: folds the registered augmenter's
    /// output in front of the raw user message.
    fn augment(&self, user_message: &str, state: &ConversationState) -> String {
        if !self.config.augment_user_message {
            return user_message.to_string();
        }
        let Some(working_context) = &state.working_context else {
            return user_message.to_string();
        };
        let Some(augmenter_output) = self.context_registry.augment(&working_context.context_type, &working_context.payload) else {
            return user_message.to_string();
        };

        format!(
            "{} {}\n\n{} {}",
            self.config.context_prefix, augmenter_output, self.config.request_prefix, user_message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_types::WorkingContext;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StubPlanner {
        plan: Mutex<Option<Plan>>,
        captured_message: Mutex<Option<String>>,
    }

    #[async_trait]
    impl Planner for StubPlanner {
        async fn plan(&self, user_message: &str, _state: &ConversationState) -> Plan {
            *self.captured_message.lock().unwrap() = Some(user_message.to_string());
            self.plan.lock().unwrap().take().unwrap_or_else(|| Plan::new("", Vec::new()))
        }
    }

    fn ready_plan() -> Plan {
        let mut args = OrderedMap::new();
        args.insert("bundleId".to_string(), Value::String("A1".into()));
        Plan::new(
            "ok",
            vec![convo_types::Step::Action {
                description: String::new(),
                action_id: "displayControlChart".into(),
                arguments_by_name: args,
            }],
        )
    }

    #[derive(Default)]
    struct InMemoryStore {
        sessions: Mutex<HashMap<String, ConversationState>>,
    }

    #[async_trait]
    impl StateStore for InMemoryStore {
        async fn load(&self, session_id: &str) -> Option<ConversationState> {
            self.sessions.lock().unwrap().get(session_id).cloned()
        }
        async fn save(&self, session_id: &str, state: ConversationState) {
            self.sessions.lock().unwrap().insert(session_id.to_string(), state);
        }
    }

    #[tokio::test]
    async fn store_mode_rejects_a_blob_handle() {
        let manager = ConversationManager::store_backed(
            Arc::new(InMemoryStore::default()),
            Arc::new(StubPlanner { plan: Mutex::new(None), captured_message: Mutex::new(None) }),
            PlannerConfig::default(),
            Arc::new(ContextRegistry::new()),
        );

        let err = manager.converse("hi", Handle::Blob(vec![])).await.unwrap_err();
        assert!(matches!(err, ConverseError::WrongMode(WrongMode::ExpectedStore)));
    }

    #[tokio::test]
    async fn blob_mode_rejects_a_session_handle() {
        let manager = ConversationManager::blob_backed(
            Arc::new(StubPlanner { plan: Mutex::new(None), captured_message: Mutex::new(None) }),
            PlannerConfig::default(),
            Arc::new(ContextRegistry::new()),
            None,
        );

        let err = manager.converse("hi", Handle::Session("s1".into())).await.unwrap_err();
        assert!(matches!(err, ConverseError::WrongMode(WrongMode::ExpectedBlob)));
    }

    #[tokio::test]
    async fn store_mode_round_trips_state_across_turns() {
        let planner = Arc::new(StubPlanner { plan: Mutex::new(Some(ready_plan())), captured_message: Mutex::new(None) });
        let manager = ConversationManager::store_backed(
            Arc::new(InMemoryStore::default()),
            planner,
            PlannerConfig::default(),
            Arc::new(ContextRegistry::new()),
        );

        let result = manager.converse("export a chart", Handle::Session("s1".into())).await.unwrap();
        assert!(result.blob.is_none());
        assert_eq!(result.state.original_instruction, "export a chart");
        assert_eq!(result.state.provided_params.get("bundleId"), None);
    }

    #[tokio::test]
    async fn blob_mode_returns_a_blob_each_turn() {
        let planner = Arc::new(StubPlanner { plan: Mutex::new(Some(ready_plan())), captured_message: Mutex::new(None) });
        let manager = ConversationManager::blob_backed(planner, PlannerConfig::default(), Arc::new(ContextRegistry::new()), None);

        let result = manager.converse("export a chart", Handle::Blob(vec![])).await.unwrap();
        assert!(result.blob.is_some());
    }

    #[tokio::test]
    async fn pending_step_newly_provided_params_merge_into_next_state() {
        let mut provided = OrderedMap::new();
        provided.insert("measurementConcept".to_string(), Value::String("displacement".into()));
        let pending_plan = Plan::new(
            "",
            vec![convo_types::Step::Pending {
                description: String::new(),
                action_id: "exportControlChartToExcel".into(),
                provided_params: provided,
                pending_params: vec![PendingParam { name: "bundleId".into(), message: "Provide bundleId".into() }],
            }],
        );
        let planner = Arc::new(StubPlanner { plan: Mutex::new(Some(pending_plan)), captured_message: Mutex::new(None) });
        let manager = ConversationManager::store_backed(
            Arc::new(InMemoryStore::default()),
            planner,
            PlannerConfig::default(),
            Arc::new(ContextRegistry::new()),
        );

        let result = manager.converse("export a chart", Handle::Session("s1".into())).await.unwrap();
        assert_eq!(result.state.provided_params.get("measurementConcept"), Some(&Value::String("displacement".into())));
        assert_eq!(result.pending_params.len(), 1);
        assert_eq!(result.pending_params[0].name, "bundleId");
    }

    #[tokio::test]
    async fn expire_yields_empty_state_and_never_touches_the_store() {
        let store = Arc::new(InMemoryStore::default());
        let planner = Arc::new(StubPlanner { plan: Mutex::new(None), captured_message: Mutex::new(None) });
        let manager = ConversationManager::store_backed(store.clone(), planner, PlannerConfig::default(), Arc::new(ContextRegistry::new()));

        let result = manager.expire();
        assert_eq!(result.plan.assistant_message, "Session expired");
        assert!(result.state.original_instruction.is_empty());
        assert!(store.sessions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn augmentation_prefixes_the_effective_message_when_configured() {
        struct UppercaseAugmenter;
        impl crate::context_registry::Augmenter for UppercaseAugmenter {
            fn format_for_user_message(&self, payload: &serde_json::Value) -> String {
                payload.as_str().unwrap_or_default().to_uppercase()
            }
        }

        let registry = Arc::new(ContextRegistry::new());
        registry.register("bundleSummary", convo_types::TypeTag::String, Some(Box::new(UppercaseAugmenter)));

        let planner = Arc::new(StubPlanner { plan: Mutex::new(Some(ready_plan())), captured_message: Mutex::new(None) });
        let store = Arc::new(InMemoryStore::default());
        let mut seeded = ConversationState::initial("original");
        seeded.working_context = Some(WorkingContext::new("bundleSummary", serde_json::json!("active bundle a1")));
        store.save("s1", seeded).await;

        let manager = ConversationManager::store_backed(store, planner.clone(), PlannerConfig::default(), registry);
        manager.converse("what next", Handle::Session("s1".into())).await.unwrap();

        let captured = planner.captured_message.lock().unwrap().clone().unwrap();
        assert!(captured.starts_with("Current state: ACTIVE BUNDLE A1"));
        assert!(captured.contains("User request: what next"));
    }
}
