//! The privileged field accessor.
//!
//! `ReflectedObject` is what the merge engine writes through: by-name access
//! to every declared property of an object, regardless of how the defining
//! module would otherwise expose it. Domain types get their implementation
//! from the `reflect_object!` macro; `serde_json::Value` carries a hand
//! written one so loose values can appear on either side of a merge.

use serde_json::Value as JsonValue;
use std::any::Any;
use thiserror::Error;

use super::descriptor::ClassDescriptor;
use super::value::{EntityBox, FieldValue};

/// What an object reflects as. Only objects can be merge targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectKind {
    Object,
    Scalar,
}

#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("no property '{0}' on class '{1}'")]
    NoSuchProperty(String, String),

    #[error("value is not assignable to property '{property}' of class '{class}': {reason}")]
    TypeMismatch {
        property: String,
        class: String,
        reason: String,
    },
}

/// By-name property access over a type-erased object.
///
/// Writes go straight to the underlying slot; declared visibility does not
/// apply on this path. `take_field` moves relation slots out and clones
/// scalar slots (scalars are cheap and have no ownership to transfer).
pub trait ReflectedObject: Any + Send + Sync {
    /// Fully qualified class name of the runtime type.
    fn class_name(&self) -> &str;

    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Object
    }

    /// Introspected shape of the runtime type, when one is declared.
    fn descriptor(&self) -> Option<&ClassDescriptor> {
        None
    }

    /// Declared property names, in declaration order.
    fn field_names(&self) -> Vec<String>;

    fn get_field(&self, name: &str) -> Option<FieldValue>;

    fn take_field(&mut self, name: &str) -> Option<FieldValue>;

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ReflectError>;

    fn clone_boxed(&self) -> EntityBox;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// A concrete class with a static descriptor and a default constructor.
///
/// Implemented by `reflect_object!`; required for registry registration and
/// for the merge strategy that constructs fresh relation targets.
pub trait ReflectClass: ReflectedObject + Default + Sized + 'static {
    /// Fully qualified class name, stable for the life of the program.
    const CLASS_NAME: &'static str;

    fn class_descriptor() -> ClassDescriptor;
}

const JSON_VALUE_CLASS: &str = "serde_json::Value";

impl ReflectedObject for JsonValue {
    fn class_name(&self) -> &str {
        JSON_VALUE_CLASS
    }

    fn reflect_kind(&self) -> ReflectKind {
        if self.is_object() {
            ReflectKind::Object
        } else {
            ReflectKind::Scalar
        }
    }

    fn field_names(&self) -> Vec<String> {
        self.as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        self.as_object()?.get(name).cloned().map(FieldValue::Scalar)
    }

    fn take_field(&mut self, name: &str) -> Option<FieldValue> {
        self.as_object_mut()?.remove(name).map(FieldValue::Scalar)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ReflectError> {
        let map = self.as_object_mut().ok_or_else(|| {
            ReflectError::NoSuchProperty(name.to_string(), JSON_VALUE_CLASS.to_string())
        })?;
        match value {
            FieldValue::Scalar(scalar) => {
                map.insert(name.to_string(), scalar);
                Ok(())
            }
            _ => Err(ReflectError::TypeMismatch {
                property: name.to_string(),
                class: JSON_VALUE_CLASS.to_string(),
                reason: "loose values only hold scalar slots".to_string(),
            }),
        }
    }

    fn clone_boxed(&self) -> EntityBox {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loose_objects_reflect_as_objects() {
        let value = json!({"id": 1});
        assert_eq!(value.reflect_kind(), ReflectKind::Object);
        assert_eq!(json!(1).reflect_kind(), ReflectKind::Scalar);
        assert_eq!(json!(null).reflect_kind(), ReflectKind::Scalar);
    }

    #[test]
    fn loose_object_fields_are_scalar_slots() {
        let mut value = json!({"id": 1});
        value
            .set_field("name", FieldValue::Scalar(json!("x")))
            .unwrap();
        assert_eq!(value.field_names(), vec!["id", "name"]);

        match value.take_field("name") {
            Some(FieldValue::Scalar(v)) => assert_eq!(v, json!("x")),
            other => panic!("unexpected slot: {other:?}"),
        }
        assert!(value.get_field("name").is_none());
    }

    #[test]
    fn entity_slots_are_rejected_on_loose_values() {
        let mut value = json!({});
        let result = value.set_field("rel", FieldValue::Entity(None));
        assert!(matches!(result, Err(ReflectError::TypeMismatch { .. })));
    }
}
