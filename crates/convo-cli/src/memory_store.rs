//! An in-memory `StateStore` for the REPL — state is lost on exit,
//! which is the point of a smoke-testing harness.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use convo_engine::StateStore;
use convo_types::ConversationState;

#[derive(Default)]
pub struct InMemoryStore {
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
