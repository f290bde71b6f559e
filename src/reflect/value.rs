//! Values exchanged through the privileged field accessor.
//!
//! A field slot is either a scalar (any loose JSON value), a single related
//! entity, or a collection of related entities. The merge engine never looks
//! inside a slot beyond this distinction; everything else is metadata-driven.

use serde_json::Value as JsonValue;
use std::fmt;

use super::object::ReflectedObject;

/// Owned, type-erased entity reference.
pub type EntityBox = Box<dyn ReflectedObject>;

/// The value held by (or assigned into) a single property slot.
pub enum FieldValue {
    /// Plain field payload, kept as a loose JSON value.
    Scalar(JsonValue),
    /// Single-valued relation slot.
    Entity(Option<EntityBox>),
    /// Collection-valued relation slot.
    Collection(Vec<EntityBox>),
}

impl Clone for FieldValue {
    fn clone(&self) -> Self {
        match self {
            FieldValue::Scalar(value) => FieldValue::Scalar(value.clone()),
            FieldValue::Entity(entity) => {
                FieldValue::Entity(entity.as_ref().map(|e| e.clone_boxed()))
            }
            FieldValue::Collection(items) => {
                FieldValue::Collection(items.iter().map(|e| e.clone_boxed()).collect())
            }
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            FieldValue::Entity(Some(entity)) => {
                f.debug_tuple("Entity").field(&entity.class_name()).finish()
            }
            FieldValue::Entity(None) => f.debug_tuple("Entity").field(&"null").finish(),
            FieldValue::Collection(items) => f
                .debug_tuple("Collection")
                .field(&items.iter().map(|e| e.class_name()).collect::<Vec<_>>())
                .finish(),
        }
    }
}

impl From<JsonValue> for FieldValue {
    fn from(value: JsonValue) -> Self {
        FieldValue::Scalar(value)
    }
}

/// Runtime type name of a loose value, used as the fallback when a property
/// has a captured default but no inline type hint.
pub fn value_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "float"
            }
        }
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Loose emptiness check; the association strategies are gated on it.
///
/// Falsy: null, false, 0, 0.0, "", "0", empty array, empty object.
pub(crate) fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty() && s != "0",
        JsonValue::Array(items) => !items.is_empty(),
        JsonValue::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_names_follow_runtime_kinds() {
        assert_eq!(value_type_name(&json!(42)), "integer");
        assert_eq!(value_type_name(&json!(3.15)), "float");
        assert_eq!(value_type_name(&json!("hi")), "string");
        assert_eq!(value_type_name(&json!(true)), "boolean");
        assert_eq!(value_type_name(&json!([])), "array");
        assert_eq!(value_type_name(&json!({})), "object");
        assert_eq!(value_type_name(&json!(null)), "null");
    }

    #[test]
    fn truthiness_matches_loose_emptiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([0])));
        assert!(is_truthy(&json!({"a": null})));
    }
}
