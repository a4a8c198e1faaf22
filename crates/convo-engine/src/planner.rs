//! Wraps one model collaborator plus the parser/verifier pipeline (in
//! `convo-dsl`) into the single call the Conversation Manager invokes
//! once per turn.

use std::sync::Arc;

use async_trait::async_trait;
use convo_types::{ConversationState, Plan};

use crate::catalog::Catalog;
use crate::llm::LlmClient;
use crate::retry::build_retry_addendum;

/// The planner seam the Conversation Manager calls through. Kept as a
/// trait (rather than a concrete struct) so tests can stub it out
/// without a real model call.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, user_message: &str, state: &ConversationState) -> Plan;
}

/// Default `Planner`: builds the user prompt (appending the retry
/// addendum when the state has pending params), asks the model for
/// JSON, and runs it through `convo_dsl::parse_and_verify`.
pub struct LlmPlanner {
    llm: Arc<dyn LlmClient>,
    catalog: Arc<Catalog>,
    system_prompt: String,
}

impl LlmPlanner {
    pub fn new(llm: Arc<dyn LlmClient>, catalog: Arc<Catalog>, system_prompt: impl Into<String>) -> Self {
        Self { llm, catalog, system_prompt: system_prompt.into() }
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn plan(&self, user_message: &str, state: &ConversationState) -> Plan {
        let mut user_prompt = user_message.to_string();
        if let Some(addendum) = build_retry_addendum(state) {
            user_prompt.push_str("\n\n");
            user_prompt.push_str(&addendum);
        }

        match self.llm.chat_json(&self.system_prompt, &user_prompt).await {
            Ok(raw) => convo_dsl::parse_and_verify(&raw, self.catalog.as_ref()),
            Err(err) => Plan::single_error(format!("model invocation failed: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use convo_types::PendingParam;

    struct StubLlm {
        response: String,
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn chat(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
            Ok(self.response.clone())
        }
        async fn chat_json(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
            Ok(self.response.clone())
        }
        async fn chat_with_tool(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _tool: &crate::llm::ToolDefinition,
        ) -> Result<crate::llm::ToolCallResult> {
            unimplemented!("not exercised by these tests")
        }
        fn model_name(&self) -> &str {
            "stub"
        }
        fn provider_name(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test]
    async fn plan_parses_the_models_json_response() {
        let llm = Arc::new(StubLlm {
            response: r#"{"message":"","steps":[{"actionId":"ghost","parameters":{}}]}"#.to_string(),
        });
        let planner = LlmPlanner::new(llm, Arc::new(Catalog::new()), "system prompt");
        let state = ConversationState::initial("do it");

        let plan = planner.plan("do it", &state).await;
        assert_eq!(plan.first_error_reason(), Some("unknown action: ghost"));
    }

    #[tokio::test]
    async fn retry_addendum_is_appended_when_state_has_pending_params() {
        struct CapturingLlm {
            captured: std::sync::Mutex<Option<String>>,
        }
        #[async_trait]
        impl LlmClient for CapturingLlm {
            async fn chat(&self, _s: &str, _u: &str) -> Result<String> {
                unimplemented!()
            }
            async fn chat_json(&self, _system_prompt: &str, user_prompt: &str) -> Result<String> {
                *self.captured.lock().unwrap() = Some(user_prompt.to_string());
                Ok(r#"{"message":"","steps":[]}"#.to_string())
            }
            async fn chat_with_tool(
                &self,
                _s: &str,
                _u: &str,
                _t: &crate::llm::ToolDefinition,
            ) -> Result<crate::llm::ToolCallResult> {
                unimplemented!()
            }
            fn model_name(&self) -> &str {
                "stub"
            }
            fn provider_name(&self) -> &str {
                "stub"
            }
        }

        let llm = Arc::new(CapturingLlm { captured: std::sync::Mutex::new(None) });
        let planner = LlmPlanner::new(llm.clone(), Arc::new(Catalog::new()), "system prompt");
        let mut state = ConversationState::initial("do it");
        state.pending_params.push(PendingParam { name: "x".into(), message: "Provide x".into() });

        planner.plan("here is x", &state).await;
        let captured = llm.captured.lock().unwrap().clone().unwrap();
        assert!(captured.contains("Retrying planning."));
        assert!(captured.starts_with("here is x"));
    }
}
