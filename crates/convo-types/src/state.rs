//! Conversation State and Working Context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::collections::OrderedMap;
use crate::plan::PendingParam;
use crate::value::Value;

/// A typed domain payload the host registers a context-type for. The
/// payload itself is opaque JSON here; the Working-Context Registry
/// maps `context_type` to a concrete Rust type on the host side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingContext {
    pub context_type: String,
    pub payload: serde_json::Value,
    pub last_modified: DateTime<Utc>,
    pub metadata: HashMap<String, String>,
}

impl WorkingContext {
    pub fn new(context_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            context_type: context_type.into(),
            payload,
            last_modified: Utc::now(),
            metadata: HashMap::new(),
        }
    }
}

/// Immutable conversation state carried across turns.
///
/// All list/map fields are defensively copied by construction: every
/// constructor here takes owned data and every accessor returns a
/// reference or a clone, so there is no path to mutate a live
/// `ConversationState` in place — a new one is always built to replace
/// it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub original_instruction: String,
    pub pending_params: Vec<PendingParam>,
    pub provided_params: OrderedMap<Value>,
    pub latest_user_message: Option<String>,
    pub working_context: Option<WorkingContext>,
    pub turn_history: Vec<WorkingContext>,
}

impl ConversationState {
    /// Construct the state for a brand-new conversation, created by
    /// the Conversation Manager on first turn.
    pub fn initial(instruction: impl Into<String>) -> Self {
        Self {
            original_instruction: instruction.into(),
            pending_params: Vec::new(),
            provided_params: OrderedMap::new(),
            latest_user_message: None,
            working_context: None,
            turn_history: Vec::new(),
        }
    }

    /// An empty, inert state — used by `expire()`.
    pub fn empty() -> Self {
        Self::initial(String::new())
    }

    /// Validate the core invariants:
    /// (i) a key is in `provided_params` XOR `pending_params`, never both;
    /// (ii) `provided_params` values are non-null, keys non-blank;
    /// (iii) bounded turn history is checked by the caller (it depends
    ///       on the configured `max_history_size`, not a fixed constant).
    pub fn check_invariants(&self) -> Result<(), String> {
        for (key, value) in self.provided_params.iter() {
            if key.trim().is_empty() {
                return Err("provided_params contains a blank key".to_string());
            }
            if value.is_null() {
                return Err(format!("provided_params[{key}] is null"));
            }
            if self.pending_params.iter().any(|p| p.name == key) {
                return Err(format!("{key} is both provided and pending"));
            }
        }
        Ok(())
    }

    pub fn with_history_bound(mut self, max_history_size: usize) -> Self {
        if self.turn_history.len() > max_history_size {
            let overflow = self.turn_history.len() - max_history_size;
            self.turn_history.drain(0..overflow);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_has_no_pending_or_provided() {
        let s = ConversationState::initial("do the thing");
        assert!(s.pending_params.is_empty());
        assert!(s.provided_params.is_empty());
        assert_eq!(s.original_instruction, "do the thing");
    }

    #[test]
    fn invariant_rejects_key_that_is_both_provided_and_pending() {
        let mut s = ConversationState::initial("x");
        s.provided_params.insert("bundleId", Value::String("A1".into()));
        s.pending_params.push(PendingParam { name: "bundleId".into(), message: "Provide bundleId".into() });
        assert!(s.check_invariants().is_err());
    }

    #[test]
    fn invariant_rejects_null_provided_value() {
        let mut s = ConversationState::initial("x");
        s.provided_params.insert("bundleId", Value::Null);
        assert!(s.check_invariants().is_err());
    }

    #[test]
    fn history_bound_evicts_oldest_first() {
        let mut s = ConversationState::initial("x");
        for i in 0..5 {
            s.turn_history.push(WorkingContext::new("t", serde_json::json!(i)));
        }
        let bounded = s.with_history_bound(3);
        assert_eq!(bounded.turn_history.len(), 3);
        assert_eq!(bounded.turn_history[0].payload, serde_json::json!(2));
    }
}
