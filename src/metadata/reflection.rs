//! Reflective metadata inferencer.
//!
//! Answers "does field X exist on class C, and what is its best-guess type"
//! from introspection alone: the class descriptor's property list, inline
//! type hints, structured annotations, source imports, and captured default
//! values. It has no concept of relationships; every association and
//! identifier query reports absent, which keeps the merge engine operating
//! on plain objects when no external schema is configured.

use serde_json::Value as JsonValue;
use std::sync::Arc;

use super::provider::{ClassMetadata, MetadataProvider};
use crate::reflect::{ClassDescriptor, ClassRegistry, ReflectedObject, value_type_name};

/// Maps an inline hint to the canonical primitive type name it denotes.
fn primitive_type_name(hint: &str) -> Option<&'static str> {
    match hint {
        "integer" | "number" | "int" => Some("integer"),
        "float" | "double" | "decimal" => Some("float"),
        "string" => Some("string"),
        "boolean" | "bool" => Some("boolean"),
        "array" => Some("array"),
        "resource" => Some("resource"),
        "object" => Some("object"),
        "null" => Some("null"),
        "callable" => Some("callable"),
        _ => None,
    }
}

/// Reflection-only metadata provider.
///
/// The registry supplies the "is this a loadable class" oracle used while
/// resolving class-like hints; an empty registry is valid and simply makes
/// those resolution steps come up empty.
#[derive(Default)]
pub struct ReflectionProvider {
    registry: Arc<ClassRegistry>,
}

impl ReflectionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: Arc<ClassRegistry>) -> Self {
        Self { registry }
    }
}

impl MetadataProvider for ReflectionProvider {
    fn metadata_for_class(&self, class: &str) -> Box<dyn ClassMetadata> {
        Box::new(ReflectionMetadata {
            class_name: class.to_string(),
            descriptor: self.registry.descriptor(class).cloned(),
            registry: self.registry.clone(),
        })
    }

    fn metadata_for(&self, object: &dyn ReflectedObject) -> Box<dyn ClassMetadata> {
        // The instance carries its own descriptor, so even unregistered
        // classes reflect fully; the registry only backs hint resolution.
        let descriptor = object
            .descriptor()
            .cloned()
            .or_else(|| self.registry.descriptor(object.class_name()).cloned());
        Box::new(ReflectionMetadata {
            class_name: object.class_name().to_string(),
            descriptor,
            registry: self.registry.clone(),
        })
    }
}

/// Metadata view derived purely from a class descriptor.
pub struct ReflectionMetadata {
    class_name: String,
    descriptor: Option<ClassDescriptor>,
    registry: Arc<ClassRegistry>,
}

impl ReflectionMetadata {
    /// Hint resolution ladder, applied after stripping the `[]` marker:
    /// primitive table, registered fully-qualified class, same-namespace
    /// short name, annotation suffix match, import suffix match.
    fn resolve_hint(&self, descriptor: &ClassDescriptor, field: &str, hint: &str) -> Option<String> {
        let hint = hint.strip_suffix("[]").unwrap_or(hint);

        if let Some(primitive) = primitive_type_name(hint) {
            return Some(primitive.to_string());
        }
        if self.registry.contains(hint) {
            return Some(hint.to_string());
        }
        let namespaced = format!("{}::{}", descriptor.namespace, hint);
        if self.registry.contains(&namespaced) {
            return Some(namespaced);
        }
        if let Some(property) = descriptor.property(field) {
            if let Some(annotation) = property.annotations.iter().find(|a| a.ends_with(hint)) {
                return Some(annotation.clone());
            }
        }
        if let Some(import) = descriptor.imports.iter().find(|i| i.ends_with(hint)) {
            return Some(import.clone());
        }
        None
    }
}

impl ClassMetadata for ReflectionMetadata {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn has_field(&self, field: &str) -> bool {
        self.descriptor
            .as_ref()
            .map(|d| d.has_property(field))
            .unwrap_or(false)
    }

    fn field_names(&self) -> Vec<String> {
        self.descriptor
            .as_ref()
            .map(|d| d.property_names())
            .unwrap_or_default()
    }

    fn type_of_field(&self, field: &str) -> Option<String> {
        let descriptor = self.descriptor.as_ref()?;
        let property = descriptor.property(field)?;
        match &property.type_hint {
            Some(hint) => self.resolve_hint(descriptor, field, hint),
            None => property
                .default
                .as_ref()
                .map(|value| value_type_name(value).to_string()),
        }
    }

    fn is_identifier(&self, _field: &str) -> bool {
        false
    }

    fn identifier_field_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn identifier_values(&self, _object: &dyn ReflectedObject) -> Vec<JsonValue> {
        Vec::new()
    }

    fn single_identifier_field_name(&self) -> Option<String> {
        None
    }

    fn has_association(&self, _field: &str) -> bool {
        false
    }

    fn is_single_valued_association(&self, _field: &str) -> bool {
        false
    }

    fn is_collection_valued_association(&self, _field: &str) -> bool {
        false
    }

    fn is_association_inverse_side(&self, _field: &str) -> bool {
        false
    }

    fn association_target_class(&self, _field: &str) -> Option<String> {
        None
    }

    fn association_mapped_by_target_field(&self, _field: &str) -> Option<String> {
        None
    }

    fn association_names(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::PropertyDescriptor;
    use serde_json::json;

    fn metadata(descriptor: ClassDescriptor) -> ReflectionMetadata {
        ReflectionMetadata {
            class_name: descriptor.class_name.clone(),
            descriptor: Some(descriptor),
            registry: Arc::new(ClassRegistry::new()),
        }
    }

    #[test]
    fn primitive_hints_normalize() {
        for (hint, expected) in [
            ("int", "integer"),
            ("number", "integer"),
            ("integer", "integer"),
            ("double", "float"),
            ("decimal", "float"),
            ("float", "float"),
            ("bool", "boolean"),
            ("string", "string"),
            ("array", "array"),
            ("object", "object"),
            ("callable", "callable"),
        ] {
            assert_eq!(primitive_type_name(hint), Some(expected), "hint {hint}");
        }
        assert_eq!(primitive_type_name("DateTime"), None);
    }

    #[test]
    fn array_marker_is_stripped_before_resolution() {
        let mut descriptor = ClassDescriptor::new("app", "Post");
        descriptor
            .properties
            .push(PropertyDescriptor::new("tags").with_hint("string[]"));

        let meta = metadata(descriptor);
        assert_eq!(meta.type_of_field("tags").as_deref(), Some("string"));
    }

    #[test]
    fn default_value_type_is_the_fallback() {
        let mut descriptor = ClassDescriptor::new("app", "Post");
        descriptor
            .properties
            .push(PropertyDescriptor::new("tags").with_default(json!([])));
        descriptor.properties.push(PropertyDescriptor::new("bare"));

        let meta = metadata(descriptor);
        assert_eq!(meta.type_of_field("tags").as_deref(), Some("array"));
        assert_eq!(meta.type_of_field("bare"), None);
        assert_eq!(meta.type_of_field("absent"), None);
    }

    #[test]
    fn unresolvable_hints_come_up_empty() {
        let mut descriptor = ClassDescriptor::new("app", "Post");
        descriptor
            .properties
            .push(PropertyDescriptor::new("author").with_hint("Author"));

        let meta = metadata(descriptor);
        assert_eq!(meta.type_of_field("author"), None);
    }
}
