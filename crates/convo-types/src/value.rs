//! The untyped value tree used while parsing a plan.
//!
//! Parsing treats parameter values as an untyped tree; type coercion
//! happens only in the resolver. `Value` is that tree. It is
//! deliberately format-agnostic —
//! it is built the same way whether the source was JSON or the
//! S-expression fallback — so the parser never needs to know which
//! surface produced a given argument.

use serde::{Deserialize, Serialize};

use crate::collections::OrderedMap;

/// An untyped value parsed from a model response, before resolver
/// coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(OrderedMap<Value>),
    /// A string value that begins with `(` after trimming — an embedded
    /// sub-DSL the resolver's `TypeFactory` will construct a typed
    /// payload from. Kept distinct from `String` so the resolver does
    /// not need to re-sniff every string argument.
    Embedded { sublanguage: Option<String>, source: String },
}

impl Value {
    /// Detect whether a raw string argument should be treated as an
    /// embedded sub-DSL rather than a plain string.
    pub fn from_raw_string(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim_start().starts_with('(') {
            Value::Embedded { sublanguage: None, source: s }
        } else {
            Value::String(s)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert from a `serde_json::Value`, routing bare strings starting
    /// with `(` through [`Value::from_raw_string`] so the JSON and
    /// S-expression surfaces agree on what counts as embedded DSL.
    pub fn from_json(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::from_raw_string(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let mut ordered = OrderedMap::new();
                for (k, v) in map {
                    ordered.insert(k, Value::from_json(v));
                }
                Value::Map(ordered)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_string_stays_string() {
        assert_eq!(Value::from_raw_string("hello"), Value::String("hello".into()));
    }

    #[test]
    fn parenthesized_string_becomes_embedded() {
        let v = Value::from_raw_string("  (EMBED sql (select 1))");
        assert!(matches!(v, Value::Embedded { .. }));
    }

    #[test]
    fn json_number_without_fraction_is_int() {
        let v = Value::from_json(serde_json::json!(42));
        assert_eq!(v, Value::Int(42));
    }

    #[test]
    fn json_object_preserves_key_order() {
        let v = Value::from_json(serde_json::json!({"z": 1, "a": 2}));
        match v {
            Value::Map(m) => assert_eq!(m.keys().collect::<Vec<_>>(), vec!["z", "a"]),
            _ => panic!("expected map"),
        }
    }
}
