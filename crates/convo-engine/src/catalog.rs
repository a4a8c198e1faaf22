//! The Action Catalog: an in-memory, read-after-build registry of
//! action descriptors.

use std::collections::HashMap;

use convo_types::{ActionDescriptor, CatalogConflict, CatalogLookup, ParamDescriptor};

/// In-memory action registry. Read-only after `register` calls
/// finish: safe for concurrent reads once built.
#[derive(Default)]
pub struct Catalog {
    actions: HashMap<String, ActionDescriptor>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one action descriptor. Fails with `CatalogConflict` if
    /// its id is already registered.
    pub fn register(&mut self, action: ActionDescriptor) -> Result<(), CatalogConflict> {
        if self.actions.contains_key(&action.id) {
            return Err(CatalogConflict { id: action.id });
        }
        self.actions.insert(action.id.clone(), action);
        Ok(())
    }

    pub fn by_id(&self, id: &str) -> Option<&ActionDescriptor> {
        self.actions.get(id)
    }

    pub fn all(&self) -> Vec<&ActionDescriptor> {
        self.actions.values().collect()
    }

    pub fn parameter_order(&self, id: &str) -> Option<Vec<&str>> {
        self.actions.get(id).map(ActionDescriptor::parameter_order)
    }
}

impl CatalogLookup for Catalog {
    fn exists(&self, action_id: &str) -> bool {
        self.actions.contains_key(action_id)
    }

    fn params(&self, action_id: &str) -> Option<Vec<ParamDescriptor>> {
        self.actions.get(action_id).map(|a| a.params.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_types::TypeTag;

    fn sample(id: &str) -> ActionDescriptor {
        ActionDescriptor::builder(id)
            .param(ParamDescriptor::new("x", TypeTag::String))
            .handler(|_args, _ctx| Ok(serde_json::Value::Null))
    }

    #[test]
    fn register_then_lookup_round_trips() {
        let mut catalog = Catalog::new();
        catalog.register(sample("runSqlQuery")).unwrap();
        assert!(catalog.exists("runSqlQuery"));
        assert_eq!(catalog.parameter_order("runSqlQuery"), Some(vec!["x"]));
    }

    #[test]
    fn duplicate_register_fails_with_catalog_conflict() {
        let mut catalog = Catalog::new();
        catalog.register(sample("runSqlQuery")).unwrap();
        let err = catalog.register(sample("runSqlQuery")).unwrap_err();
        assert_eq!(err.id, "runSqlQuery");
    }

    #[test]
    fn unknown_id_reports_absent() {
        let catalog = Catalog::new();
        assert!(!catalog.exists("ghost"));
        assert!(catalog.by_id("ghost").is_none());
    }
}
