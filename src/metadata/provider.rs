//! Metadata provider seam.
//!
//! The merge engine is written only against these traits. Two variants
//! exist: the schema-backed `SchemaRegistry` (explicit field/association
//! mappings, identifier knowledge) and the `ReflectionProvider` (pure
//! introspection, no relationship concept). Both answer every query with a
//! definite boolean or an absent value; neither ever fails.

use serde_json::Value as JsonValue;

use crate::reflect::ReflectedObject;

/// Per-class metadata view.
///
/// Mirrors the capability surface the merge engine consumes: plain field
/// queries, association queries, and identifier queries. Implementations
/// with no concept of a given aspect report `false`/`None`/empty rather
/// than erroring.
pub trait ClassMetadata {
    fn class_name(&self) -> &str;

    fn has_field(&self, field: &str) -> bool;

    /// Declared field names, in declaration order where known.
    fn field_names(&self) -> Vec<String>;

    /// Best-guess semantic type of a field; diagnostics only, never
    /// enforced at merge time.
    fn type_of_field(&self, field: &str) -> Option<String>;

    fn is_identifier(&self, field: &str) -> bool;

    fn identifier_field_names(&self) -> Vec<String>;

    /// Identifier values of a concrete instance, in identifier field order.
    fn identifier_values(&self, object: &dyn ReflectedObject) -> Vec<JsonValue>;

    /// The identifier field name, when the class has exactly one.
    fn single_identifier_field_name(&self) -> Option<String>;

    fn has_association(&self, field: &str) -> bool;

    fn is_single_valued_association(&self, field: &str) -> bool;

    fn is_collection_valued_association(&self, field: &str) -> bool;

    fn is_association_inverse_side(&self, field: &str) -> bool;

    fn association_target_class(&self, field: &str) -> Option<String>;

    fn association_mapped_by_target_field(&self, field: &str) -> Option<String>;

    fn association_names(&self) -> Vec<String>;
}

/// Source of per-class metadata, selected at merger construction time.
pub trait MetadataProvider: Send + Sync {
    fn metadata_for_class(&self, class: &str) -> Box<dyn ClassMetadata>;

    /// Metadata for a concrete instance. Defaults to a by-name lookup;
    /// reflection overrides this to use the object's own descriptor.
    fn metadata_for(&self, object: &dyn ReflectedObject) -> Box<dyn ClassMetadata> {
        self.metadata_for_class(object.class_name())
    }
}
