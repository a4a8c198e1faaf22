//! The Retry Prompt Builder: a pure function producing the addendum a
//! caller appends to the next system prompt when a conversation state
//! has pending parameters.

use convo_types::ConversationState;

const DIRECTIVE: &str = "use the latest reply only to satisfy pending items; otherwise emit PENDING; do not invent actions or parameters; output a single structured plan only";

/// `buildRetryAddendum(state) -> string?`. Returns `None` when
/// `state.pending_params` is empty.
pub fn build_retry_addendum(state: &ConversationState) -> Option<String> {
    if state.pending_params.is_empty() {
        return None;
    }

    let mut lines = vec!["Retrying planning.".to_string()];

    if !state.original_instruction.trim().is_empty() {
        lines.push(state.original_instruction.clone());
    }

    let provided = state
        .provided_params
        .iter()
        .map(|(k, v)| format!("{k}={}", render_value(v)))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Already provided: {provided}"));

    let pending = state
        .pending_params
        .iter()
        .map(|p| format!("{} ({})", p.name, p.message))
        .collect::<Vec<_>>()
        .join("; ");
    lines.push(format!("Pending: {pending}"));

    if let Some(msg) = &state.latest_user_message {
        lines.push(format!("\"{msg}\""));
    }

    lines.push(DIRECTIVE.to_string());

    Some(lines.join("\n"))
}

fn render_value(v: &convo_types::Value) -> String {
    match v {
        convo_types::Value::String(s) => s.clone(),
        convo_types::Value::Int(i) => i.to_string(),
        convo_types::Value::Float(f) => f.to_string(),
        convo_types::Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(&plain_json(other)).unwrap_or_default(),
    }
}

fn plain_json(v: &convo_types::Value) -> serde_json::Value {
    match v {
        convo_types::Value::Null => serde_json::Value::Null,
        convo_types::Value::Bool(b) => serde_json::Value::Bool(*b),
        convo_types::Value::Int(i) => serde_json::Value::Number((*i).into()),
        convo_types::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        convo_types::Value::String(s) => serde_json::Value::String(s.clone()),
        convo_types::Value::List(items) => serde_json::Value::Array(items.iter().map(plain_json).collect()),
        convo_types::Value::Map(m) => {
            serde_json::Value::Object(m.iter().map(|(k, v)| (k.to_string(), plain_json(v))).collect())
        }
        convo_types::Value::Embedded { source, .. } => serde_json::Value::String(source.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_types::{PendingParam, Value};

    #[test]
    fn no_pending_params_yields_none() {
        let state = ConversationState::initial("do the thing");
        assert!(build_retry_addendum(&state).is_none());
    }

    #[test]
    fn addendum_contains_instruction_provided_pending_and_message() {
        let mut state = ConversationState::initial("export a control chart");
        state.provided_params.insert("measurementConcept", Value::String("displacement".into()));
        state.pending_params.push(PendingParam { name: "bundleId".into(), message: "Provide bundleId".into() });
        state.latest_user_message = Some("the bundle id is A12345".to_string());

        let addendum = build_retry_addendum(&state).unwrap();
        assert!(addendum.starts_with("Retrying planning."));
        assert!(addendum.contains("export a control chart"));
        assert!(addendum.contains("Already provided: measurementConcept=displacement"));
        assert!(addendum.contains("Pending: bundleId (Provide bundleId)"));
        assert!(addendum.contains("\"the bundle id is A12345\""));
        assert!(addendum.ends_with("output a single structured plan only"));
    }

    #[test]
    fn blank_original_instruction_is_skipped() {
        let mut state = ConversationState::initial("   ");
        state.pending_params.push(PendingParam { name: "x".into(), message: "Provide x".into() });
        let addendum = build_retry_addendum(&state).unwrap();
        assert!(!addendum.contains("   \n"));
    }
}
