//! Parameter and type-tag definitions — the shape half of the Action
//! Descriptor data model.

use serde::{Deserialize, Serialize};

/// The declared type of one action parameter.
///
/// Primitive tags are coerced directly by the resolver; `Nested` defers
/// to a `TypeFactory` registered under the tag's schema name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeTag {
    String,
    Int,
    Bool,
    Float,
    List(Box<TypeTag>),
    /// A complex, domain-specific shape. The string names the schema a
    /// `TypeFactory` is registered under (the `nestedSchemaTag`).
    Nested(String),
}

impl TypeTag {
    pub fn nested(tag: impl Into<String>) -> Self {
        TypeTag::Nested(tag.into())
    }

    pub fn list_of(inner: TypeTag) -> Self {
        TypeTag::List(Box::new(inner))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeTag::String | TypeTag::Int | TypeTag::Bool | TypeTag::Float)
    }
}

/// One parameter of an action, in the order it appears on the
/// descriptor's authoritative parameter list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    /// Present only when `type_tag` is `Nested`; mirrors the tag so
    /// callers that only have a `&ParamDescriptor` don't need to
    /// destructure `type_tag`.
    pub nested_schema_tag: Option<String>,
    pub description: Option<String>,
    /// Regex a numeric/string value must match; mismatch demotes a
    /// step to `ErrorStep` rather than coercing past it (see DESIGN.md).
    pub allowed_pattern: Option<String>,
    pub examples: Vec<String>,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        let nested_schema_tag = match &type_tag {
            TypeTag::Nested(tag) => Some(tag.clone()),
            _ => None,
        };
        Self {
            name: name.into(),
            type_tag,
            nested_schema_tag,
            description: None,
            allowed_pattern: None,
            examples: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_pattern = Some(pattern.into());
        self
    }

    /// The prompt used when this parameter is missing: `"Provide
    /// <name>"`, falling back to the description when present.
    pub fn pending_message(&self) -> String {
        match &self.description {
            Some(desc) if !desc.trim().is_empty() => desc.clone(),
            _ => format!("Provide {}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_message_prefers_description() {
        let p = ParamDescriptor::new("bundleId", TypeTag::String)
            .with_description("the bundle identifier to export");
        assert_eq!(p.pending_message(), "the bundle identifier to export");
    }

    #[test]
    fn pending_message_falls_back_to_name() {
        let p = ParamDescriptor::new("bundleId", TypeTag::String);
        assert_eq!(p.pending_message(), "Provide bundleId");
    }

    #[test]
    fn nested_tag_populates_schema_name() {
        let p = ParamDescriptor::new("filter", TypeTag::nested("QueryFilter"));
        assert_eq!(p.nested_schema_tag.as_deref(), Some("QueryFilter"));
    }
}
