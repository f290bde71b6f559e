//! Serializer collaborator.
//!
//! Optional pre-step used only to normalize an object payload into a map
//! before merging (merging one object into another). `JsonObjectSerializer`
//! walks the privileged accessor, omits null fields, and nests relations as
//! objects and arrays.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::reflect::{FieldValue, ReflectedObject};

pub type SerializeResult<T> = Result<T, SerializeError>;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serialized payload is not a JSON object")]
    NotAMap,
}

/// Converts objects to and from a neutral map representation.
pub trait ObjectSerializer: Send + Sync {
    fn serialize(&self, object: &dyn ReflectedObject) -> SerializeResult<String>;

    fn decode_to_map(&self, payload: &str) -> SerializeResult<Map<String, JsonValue>>;
}

/// serde_json-backed serializer. Null fields are omitted, so merging a
/// serialized object only touches the fields it actually carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonObjectSerializer;

impl JsonObjectSerializer {
    pub fn new() -> Self {
        Self
    }

    fn object_to_value(object: &dyn ReflectedObject) -> JsonValue {
        let mut map = Map::new();
        for name in object.field_names() {
            let Some(slot) = object.get_field(&name) else {
                continue;
            };
            let value = match slot {
                FieldValue::Scalar(value) => value,
                FieldValue::Entity(Some(entity)) => Self::object_to_value(entity.as_ref()),
                FieldValue::Entity(None) => JsonValue::Null,
                FieldValue::Collection(items) => JsonValue::Array(
                    items
                        .iter()
                        .map(|entity| Self::object_to_value(entity.as_ref()))
                        .collect(),
                ),
            };
            if value.is_null() {
                continue;
            }
            map.insert(name, value);
        }
        JsonValue::Object(map)
    }
}

impl ObjectSerializer for JsonObjectSerializer {
    fn serialize(&self, object: &dyn ReflectedObject) -> SerializeResult<String> {
        Ok(serde_json::to_string(&Self::object_to_value(object))?)
    }

    fn decode_to_map(&self, payload: &str) -> SerializeResult<Map<String, JsonValue>> {
        match serde_json::from_str::<JsonValue>(payload)? {
            JsonValue::Object(map) => Ok(map),
            _ => Err(SerializeError::NotAMap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialization_omits_null_fields() {
        let serializer = JsonObjectSerializer::new();
        let source = json!({"id": 1, "name": null, "tags": []});

        let text = serializer.serialize(&source).unwrap();
        let map = serializer.decode_to_map(&text).unwrap();

        assert_eq!(map.get("id"), Some(&json!(1)));
        assert_eq!(map.get("tags"), Some(&json!([])));
        assert!(!map.contains_key("name"));
    }

    #[test]
    fn non_object_payloads_are_rejected() {
        let serializer = JsonObjectSerializer::new();
        assert!(matches!(
            serializer.decode_to_map("[1, 2]"),
            Err(SerializeError::NotAMap)
        ));
        assert!(matches!(
            serializer.decode_to_map("not json"),
            Err(SerializeError::Json(_))
        ));
    }
}
