//! Schema-backed metadata.
//!
//! The explicit variant of the metadata seam: callers describe each class
//! up front (fields, identifier, associations) and the merge engine gets
//! exact answers, including relationship structure the reflective variant
//! cannot see.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

use super::provider::{ClassMetadata, MetadataProvider};
use crate::reflect::{FieldValue, ReflectedObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    Single,
    Collection,
}

#[derive(Debug, Clone)]
pub struct FieldMapping {
    pub name: String,
    pub declared_type: Option<String>,
    pub identifier: bool,
}

#[derive(Debug, Clone)]
pub struct AssociationMapping {
    pub name: String,
    pub target_class: String,
    pub kind: AssociationKind,
    pub inverse_side: bool,
    pub mapped_by: Option<String>,
}

/// Declared mapping of one class: plain fields, identifier fields, and
/// associations with their target classes.
#[derive(Debug, Clone)]
pub struct ClassSchema {
    class_name: String,
    fields: Vec<FieldMapping>,
    associations: Vec<AssociationMapping>,
}

impl ClassSchema {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: Vec::new(),
            associations: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        self.fields.push(FieldMapping {
            name: name.into(),
            declared_type: Some(declared_type.into()),
            identifier: false,
        });
        self
    }

    pub fn identifier(mut self, name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        self.fields.push(FieldMapping {
            name: name.into(),
            declared_type: Some(declared_type.into()),
            identifier: true,
        });
        self
    }

    pub fn single_association(
        self,
        name: impl Into<String>,
        target_class: impl Into<String>,
    ) -> Self {
        self.association(AssociationMapping {
            name: name.into(),
            target_class: target_class.into(),
            kind: AssociationKind::Single,
            inverse_side: false,
            mapped_by: None,
        })
    }

    pub fn collection_association(
        self,
        name: impl Into<String>,
        target_class: impl Into<String>,
    ) -> Self {
        self.association(AssociationMapping {
            name: name.into(),
            target_class: target_class.into(),
            kind: AssociationKind::Collection,
            inverse_side: false,
            mapped_by: None,
        })
    }

    pub fn association(mut self, mapping: AssociationMapping) -> Self {
        self.associations.push(mapping);
        self
    }

    fn association_named(&self, name: &str) -> Option<&AssociationMapping> {
        self.associations.iter().find(|a| a.name == name)
    }
}

/// Schema-backed metadata provider: a set of class schemas.
#[derive(Default)]
pub struct SchemaRegistry {
    classes: HashMap<String, Arc<ClassSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(mut self, schema: ClassSchema) -> Self {
        self.classes
            .insert(schema.class_name.clone(), Arc::new(schema));
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }
}

impl MetadataProvider for SchemaRegistry {
    fn metadata_for_class(&self, class: &str) -> Box<dyn ClassMetadata> {
        match self.classes.get(class) {
            Some(schema) => Box::new(SchemaMetadata {
                schema: schema.clone(),
            }),
            // Unknown classes get an empty view; the engine turns that into
            // an unmapped-field failure at the offending property.
            None => Box::new(MissingClassMetadata {
                class_name: class.to_string(),
            }),
        }
    }
}

struct SchemaMetadata {
    schema: Arc<ClassSchema>,
}

impl ClassMetadata for SchemaMetadata {
    fn class_name(&self) -> &str {
        &self.schema.class_name
    }

    fn has_field(&self, field: &str) -> bool {
        self.schema.fields.iter().any(|f| f.name == field)
    }

    fn field_names(&self) -> Vec<String> {
        self.schema.fields.iter().map(|f| f.name.clone()).collect()
    }

    fn type_of_field(&self, field: &str) -> Option<String> {
        self.schema
            .fields
            .iter()
            .find(|f| f.name == field)
            .and_then(|f| f.declared_type.clone())
    }

    fn is_identifier(&self, field: &str) -> bool {
        self.schema
            .fields
            .iter()
            .any(|f| f.name == field && f.identifier)
    }

    fn identifier_field_names(&self) -> Vec<String> {
        self.schema
            .fields
            .iter()
            .filter(|f| f.identifier)
            .map(|f| f.name.clone())
            .collect()
    }

    fn identifier_values(&self, object: &dyn ReflectedObject) -> Vec<JsonValue> {
        self.identifier_field_names()
            .iter()
            .filter_map(|name| match object.get_field(name) {
                Some(FieldValue::Scalar(value)) => Some(value),
                _ => None,
            })
            .collect()
    }

    fn single_identifier_field_name(&self) -> Option<String> {
        let identifiers = self.identifier_field_names();
        match identifiers.as_slice() {
            [single] => Some(single.clone()),
            _ => None,
        }
    }

    fn has_association(&self, field: &str) -> bool {
        self.schema.association_named(field).is_some()
    }

    fn is_single_valued_association(&self, field: &str) -> bool {
        self.schema
            .association_named(field)
            .map(|a| a.kind == AssociationKind::Single)
            .unwrap_or(false)
    }

    fn is_collection_valued_association(&self, field: &str) -> bool {
        self.schema
            .association_named(field)
            .map(|a| a.kind == AssociationKind::Collection)
            .unwrap_or(false)
    }

    fn is_association_inverse_side(&self, field: &str) -> bool {
        self.schema
            .association_named(field)
            .map(|a| a.inverse_side)
            .unwrap_or(false)
    }

    fn association_target_class(&self, field: &str) -> Option<String> {
        self.schema
            .association_named(field)
            .map(|a| a.target_class.clone())
    }

    fn association_mapped_by_target_field(&self, field: &str) -> Option<String> {
        self.schema
            .association_named(field)
            .and_then(|a| a.mapped_by.clone())
    }

    fn association_names(&self) -> Vec<String> {
        self.schema
            .associations
            .iter()
            .map(|a| a.name.clone())
            .collect()
    }
}

/// Empty view handed out for classes the schema registry does not know.
struct MissingClassMetadata {
    class_name: String,
}

impl ClassMetadata for MissingClassMetadata {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn has_field(&self, _field: &str) -> bool {
        false
    }

    fn field_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn type_of_field(&self, _field: &str) -> Option<String> {
        None
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

    fn schema() -> SchemaRegistry {
        SchemaRegistry::new().define(
            ClassSchema::new("app::Order")
                .identifier("id", "integer")
                .field("label", "string")
                .single_association("customer", "app::Customer")
                .collection_association("lines", "app::OrderLine"),
        )
    }

    #[test]
    fn fields_and_associations_are_disjoint() {
        let meta = schema().metadata_for_class("app::Order");
        assert!(meta.has_field("label"));
        assert!(!meta.has_field("customer"));
        assert!(meta.has_association("customer"));
        assert!(!meta.has_association("label"));
    }

    #[test]
    fn association_shape_queries() {
        let meta = schema().metadata_for_class("app::Order");
        assert!(meta.is_single_valued_association("customer"));
        assert!(!meta.is_collection_valued_association("customer"));
        assert!(meta.is_collection_valued_association("lines"));
        assert_eq!(
            meta.association_target_class("customer").as_deref(),
            Some("app::Customer")
        );
        assert_eq!(meta.association_names(), vec!["customer", "lines"]);
    }

    #[test]
    fn identifier_queries() {
        let meta = schema().metadata_for_class("app::Order");
        assert!(meta.is_identifier("id"));
        assert!(!meta.is_identifier("label"));
        assert_eq!(meta.single_identifier_field_name().as_deref(), Some("id"));
        assert_eq!(meta.type_of_field("id").as_deref(), Some("integer"));
    }

    #[test]
    fn unknown_classes_get_an_empty_view() {
        let meta = schema().metadata_for_class("app::Missing");
        assert_eq!(meta.class_name(), "app::Missing");
        assert!(!meta.has_field("id"));
        assert!(meta.field_names().is_empty());
        assert_eq!(meta.single_identifier_field_name(), None);
    }
}
