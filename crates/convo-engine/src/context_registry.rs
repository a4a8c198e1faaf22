//! The Working-Context Registry: maps a host-defined `contextType` to
//! its payload type tag and an optional augmenter used to fold working
//! context into the next user message.

use std::collections::HashMap;
use std::sync::RwLock;

use convo_types::TypeTag;

/// Formats a working context's payload for inclusion in the augmented
/// user message.
pub trait Augmenter: Send + Sync {
    /// Render the payload as text to splice after `contextPrefix`.
    fn format_for_user_message(&self, payload: &serde_json::Value) -> String;

    /// Whether this context type should be augmented at all. Defaults
    /// to `true`; a host can register a context type purely for
    /// round-tripping without ever surfacing it to the model.
    fn should_augment(&self) -> bool {
        true
    }
}

struct Entry {
    payload_type: TypeTag,
    augmenter: Option<Box<dyn Augmenter>>,
}

/// Thread-safe registry of context types, written once at startup and
/// read on every turn thereafter.
#[derive(Default)]
pub struct ContextRegistry {
    entries: RwLock<HashMap<String, Entry>>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        context_type: impl Into<String>,
        payload_type: TypeTag,
        augmenter: Option<Box<dyn Augmenter>>,
    ) {
        self.entries
            .write()
            .unwrap()
            .insert(context_type.into(), Entry { payload_type, augmenter });
    }

    pub fn get_payload_type(&self, context_type: &str) -> Option<TypeTag> {
        self.entries.read().unwrap().get(context_type).map(|e| e.payload_type.clone())
    }

    /// Render `payload` via the registered augmenter for `context_type`,
    /// or `None` if no context type is registered, no augmenter was
    /// supplied, or the augmenter opts out via `should_augment`.
    pub fn augment(&self, context_type: &str, payload: &serde_json::Value) -> Option<String> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(context_type)?;
        let augmenter = entry.augmenter.as_ref()?;
        if !augmenter.should_augment() {
            return None;
        }
        Some(augmenter.format_for_user_message(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UppercaseAugmenter;
    impl Augmenter for UppercaseAugmenter {
        fn format_for_user_message(&self, payload: &serde_json::Value) -> String {
            payload.as_str().unwrap_or_default().to_uppercase()
        }
    }

    struct SilentAugmenter;
    impl Augmenter for SilentAugmenter {
        fn format_for_user_message(&self, _payload: &serde_json::Value) -> String {
            String::new()
        }
        fn should_augment(&self) -> bool {
            false
        }
    }

    #[test]
    fn registered_context_type_round_trips_payload_type() {
        let registry = ContextRegistry::new();
        registry.register("bundleSummary", TypeTag::String, None);
        assert!(matches!(registry.get_payload_type("bundleSummary"), Some(TypeTag::String)));
    }

    #[test]
    fn unregistered_context_type_has_no_payload_type() {
        let registry = ContextRegistry::new();
        assert!(registry.get_payload_type("ghost").is_none());
    }

    #[test]
    fn augment_renders_via_registered_augmenter() {
        let registry = ContextRegistry::new();
        registry.register("bundleSummary", TypeTag::String, Some(Box::new(UppercaseAugmenter)));
        let rendered = registry.augment("bundleSummary", &serde_json::json!("hello"));
        assert_eq!(rendered, Some("HELLO".to_string()));
    }

    #[test]
    fn augmenter_opting_out_yields_no_augmentation() {
        let registry = ContextRegistry::new();
        registry.register("silentType", TypeTag::String, Some(Box::new(SilentAugmenter)));
        assert!(registry.augment("silentType", &serde_json::json!("x")).is_none());
    }

    #[test]
    fn context_type_with_no_augmenter_yields_no_augmentation() {
        let registry = ContextRegistry::new();
        registry.register("bare", TypeTag::String, None);
        assert!(registry.augment("bare", &serde_json::json!("x")).is_none());
    }
}
