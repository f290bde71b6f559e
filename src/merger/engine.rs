//! Merge Engine
//!
//! The facade of the crate: walks a requested field set over a target
//! object, resolves each field's nature through the active metadata
//! provider, and applies the matching mutation (scalar assignment for
//! plain fields, store lookup and/or recursive merge for associations)
//! under the configured association strategy. The target is mutated in
//! place; any failure aborts the call and leaves earlier mutations
//! applied.

use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use super::directive::{DirectiveSpec, Directives};
use super::strategy::AssociationStrategy;
use crate::core::{MergeError, MergeResult};
use crate::metadata::{ClassMetadata, MetadataProvider, ReflectionProvider};
use crate::reflect::{ClassRegistry, FieldValue, ReflectKind, ReflectedObject, is_truthy};
use crate::serializer::ObjectSerializer;
use crate::store::ObjectStore;

/// Incoming data: either a loose map or another object (which requires a
/// configured serializer to normalize).
pub enum DataPayload<'a> {
    Map(Map<String, JsonValue>),
    Object(&'a dyn ReflectedObject),
}

impl From<Map<String, JsonValue>> for DataPayload<'static> {
    fn from(map: Map<String, JsonValue>) -> Self {
        DataPayload::Map(map)
    }
}

impl From<JsonValue> for DataPayload<'static> {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => DataPayload::Map(map),
            // Anything else normalizes to no data and fails the emptiness
            // precondition.
            _ => DataPayload::Map(Map::new()),
        }
    }
}

impl<'a> From<&'a dyn ReflectedObject> for DataPayload<'a> {
    fn from(object: &'a dyn ReflectedObject) -> Self {
        DataPayload::Object(object)
    }
}

impl<'a, T: ReflectedObject> From<&'a T> for DataPayload<'a> {
    fn from(object: &'a T) -> Self {
        DataPayload::Object(object)
    }
}

/// Merges loose data into domain objects, field by field, using class
/// metadata to tell plain fields from associations.
pub struct EntityMerger {
    provider: Option<Arc<dyn MetadataProvider>>,
    store: Option<Arc<dyn ObjectStore>>,
    serializer: Option<Arc<dyn ObjectSerializer>>,
    registry: Arc<ClassRegistry>,
    strategy: AssociationStrategy,
}

impl EntityMerger {
    /// Reflection-only merger: no store, no serializer, default strategy.
    pub fn new() -> Self {
        Self {
            provider: None,
            store: None,
            serializer: None,
            registry: Arc::new(ClassRegistry::new()),
            strategy: AssociationStrategy::default(),
        }
    }

    /// Uses an external metadata provider instead of pure reflection.
    pub fn with_provider(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn ObjectSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Registry used for hint resolution and for constructing relation
    /// targets under the merge strategy.
    pub fn with_registry(mut self, registry: Arc<ClassRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_strategy(mut self, strategy: AssociationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn association_strategy(&self) -> AssociationStrategy {
        self.strategy
    }

    pub fn set_association_strategy(&mut self, strategy: AssociationStrategy) {
        self.strategy = strategy;
    }

    /// Merges every key present in `data` into `target`.
    pub fn merge<'d>(
        &self,
        target: &mut dyn ReflectedObject,
        data: impl Into<DataPayload<'d>>,
    ) -> MergeResult<()> {
        self.merge_mapped(target, data, &Directives::default())
    }

    /// Merges the keys named by `directives` into `target`.
    ///
    /// With an empty directive set every data key is merged with default
    /// directives. Directives are processed in insertion order; a directive
    /// whose key is absent from the data fails the call at that point,
    /// leaving earlier fields applied.
    pub fn merge_mapped<'d>(
        &self,
        target: &mut dyn ReflectedObject,
        data: impl Into<DataPayload<'d>>,
        directives: &Directives,
    ) -> MergeResult<()> {
        if target.reflect_kind() != ReflectKind::Object {
            return Err(MergeError::InvalidTarget);
        }
        let data = self.normalize(data.into())?;
        if data.is_empty() {
            return Err(MergeError::EmptyData);
        }
        self.apply(target, &data, directives)
    }

    fn normalize(&self, payload: DataPayload<'_>) -> MergeResult<Map<String, JsonValue>> {
        match payload {
            DataPayload::Map(map) => Ok(map),
            DataPayload::Object(object) => {
                let serializer = self
                    .serializer
                    .as_ref()
                    .ok_or(MergeError::UnsupportedDataObject)?;
                let text = serializer.serialize(object)?;
                Ok(serializer.decode_to_map(&text)?)
            }
        }
    }

    fn apply(
        &self,
        target: &mut dyn ReflectedObject,
        data: &Map<String, JsonValue>,
        directives: &Directives,
    ) -> MergeResult<()> {
        if directives.is_empty() {
            for (field, value) in data {
                self.merge_field(target, field, value, &DirectiveSpec::default())?;
            }
        } else {
            for (field, spec) in directives.iter() {
                match data.get(field) {
                    Some(value) => self.merge_field(target, field, value, spec)?,
                    None => return Err(MergeError::MissingDataKey(field.to_string())),
                }
            }
        }
        Ok(())
    }

    fn merge_field(
        &self,
        target: &mut dyn ReflectedObject,
        data_key: &str,
        value: &JsonValue,
        spec: &DirectiveSpec,
    ) -> MergeResult<()> {
        let class = target.class_name().to_string();
        let object_field = spec
            .object_field
            .clone()
            .unwrap_or_else(|| data_key.to_string());
        let metadata = self.metadata_for(target);

        if metadata.has_field(&object_field) {
            log::trace!("assigning plain field {class}.{object_field}");
            target
                .set_field(&object_field, FieldValue::Scalar(value.clone()))
                .map_err(MergeError::from)
        } else if metadata.has_association(&object_field) {
            self.merge_association(target, metadata.as_ref(), &object_field, value, spec)
        } else {
            Err(MergeError::UnmappedField {
                field: object_field,
                class,
            })
        }
    }

    fn merge_association(
        &self,
        target: &mut dyn ReflectedObject,
        metadata: &dyn ClassMetadata,
        object_field: &str,
        value: &JsonValue,
        spec: &DirectiveSpec,
    ) -> MergeResult<()> {
        let class = target.class_name().to_string();
        let relation_class = metadata
            .association_target_class(object_field)
            .ok_or_else(|| MergeError::MissingAssociationTarget {
                field: object_field.to_string(),
                class: class.clone(),
            })?;

        let pivot_key = self.resolve_pivot_key(spec, value, &relation_class);

        if let Some(pivot_key) = pivot_key.as_deref() {
            if self.strategy.contains(AssociationStrategy::FIND) {
                self.find_association(target, metadata, object_field, value, &relation_class, pivot_key)?;
            }
        }

        if self.strategy.contains(AssociationStrategy::MERGE)
            && is_truthy(value)
            && metadata.is_single_valued_association(object_field)
        {
            let mut related = match target.take_field(object_field) {
                Some(FieldValue::Entity(Some(existing))) => existing,
                _ => self
                    .registry
                    .construct(&relation_class)
                    .ok_or_else(|| MergeError::UnknownClass(relation_class.clone()))?,
            };
            log::debug!("merge strategy: recursing into {relation_class} via {class}.{object_field}");
            // Non-object nested values normalize to no data and fail the
            // recursive call's emptiness precondition.
            self.merge_mapped(related.as_mut(), value.clone(), &Directives::default())?;
            target
                .set_field(object_field, FieldValue::Entity(Some(related)))
                .map_err(MergeError::from)?;
        }

        Ok(())
    }

    fn find_association(
        &self,
        target: &mut dyn ReflectedObject,
        metadata: &dyn ClassMetadata,
        object_field: &str,
        value: &JsonValue,
        relation_class: &str,
        pivot_key: &str,
    ) -> MergeResult<()> {
        if metadata.is_single_valued_association(object_field) {
            let related = if is_truthy(value) {
                let store = self.store()?;
                let lookup = value.get(pivot_key).cloned().unwrap_or(JsonValue::Null);
                log::debug!("find strategy: {relation_class} where {pivot_key} = {lookup}");
                store.find_one_matching(relation_class, pivot_key, &lookup)?
            } else {
                None
            };
            target
                .set_field(object_field, FieldValue::Entity(related))
                .map_err(MergeError::from)?;
        } else if metadata.is_collection_valued_association(object_field) {
            let related = if is_truthy(value) {
                let store = self.store()?;
                let values: Vec<JsonValue> = match value {
                    JsonValue::Array(items) => items.clone(),
                    scalar => vec![scalar.clone()],
                };
                log::debug!(
                    "find strategy: {relation_class} where {pivot_key} in {} values",
                    values.len()
                );
                store.find_all_matching(relation_class, pivot_key, &values)?
            } else {
                Vec::new()
            };
            target
                .set_field(object_field, FieldValue::Collection(related))
                .map_err(MergeError::from)?;
        }
        Ok(())
    }

    /// The field name used for store lookups: the (scalar) value found at
    /// the directive's pivot key inside the incoming value, or the related
    /// class's single identifier field name. A falsy value at an explicit
    /// pivot key resolves to nothing, which leaves the find branch inert.
    fn resolve_pivot_key(
        &self,
        spec: &DirectiveSpec,
        value: &JsonValue,
        relation_class: &str,
    ) -> Option<String> {
        if let Some(pivot) = spec.pivot.as_deref() {
            match value.get(pivot) {
                Some(found) if !found.is_null() && !is_truthy(found) => return None,
                Some(JsonValue::String(key)) => return Some(key.clone()),
                Some(JsonValue::Number(key)) => return Some(key.to_string()),
                Some(JsonValue::Bool(key)) => {
                    return Some(if *key { "1" } else { "0" }.to_string());
                }
                // Null, absent, and non-scalar pivot values all fall back
                // to the identifier field.
                _ => {}
            }
        }
        self.metadata_for_class(relation_class)
            .single_identifier_field_name()
    }

    fn metadata_for(&self, object: &dyn ReflectedObject) -> Box<dyn ClassMetadata> {
        match &self.provider {
            Some(provider) => provider.metadata_for(object),
            None => ReflectionProvider::with_registry(self.registry.clone()).metadata_for(object),
        }
    }

    fn metadata_for_class(&self, class: &str) -> Box<dyn ClassMetadata> {
        match &self.provider {
            Some(provider) => provider.metadata_for_class(class),
            None => {
                ReflectionProvider::with_registry(self.registry.clone()).metadata_for_class(class)
            }
        }
    }

    fn store(&self) -> MergeResult<&Arc<dyn ObjectStore>> {
        self.store
            .as_ref()
            .ok_or(MergeError::MissingCollaborator("store"))
    }
}

impl Default for EntityMerger {
    fn default() -> Self {
        Self::new()
    }
}
