//! Store collaborator.
//!
//! The merge engine delegates every identifier-based lookup to an
//! `ObjectStore`; it never manages storage itself. `MemoryStore` is a small
//! in-process implementation matching entities by scalar field equality,
//! enough to back tests and simple applications.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

use crate::reflect::{EntityBox, FieldValue, ReflectedObject};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("store lock error: {0}")]
    Lock(String),
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}

/// Lookup capability over persisted entities. Failures propagate unchanged
/// through the merge engine.
pub trait ObjectStore: Send + Sync {
    /// Exactly-one lookup: the first entity of `class` whose `field` equals
    /// `value`, if any.
    fn find_one_matching(
        &self,
        class: &str,
        field: &str,
        value: &JsonValue,
    ) -> StoreResult<Option<EntityBox>>;

    /// Set lookup: every entity of `class` whose `field` is one of `values`.
    fn find_all_matching(
        &self,
        class: &str,
        field: &str,
        values: &[JsonValue],
    ) -> StoreResult<Vec<EntityBox>>;
}

/// In-process store keyed by class name.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<String, Vec<EntityBox>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: ReflectedObject>(&self, entity: T) -> StoreResult<()> {
        let mut rows = self.rows.write()?;
        rows.entry(entity.class_name().to_string())
            .or_default()
            .push(Box::new(entity));
        Ok(())
    }

    fn scalar_of(entity: &EntityBox, field: &str) -> Option<JsonValue> {
        match entity.get_field(field) {
            Some(FieldValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }
}

impl ObjectStore for MemoryStore {
    fn find_one_matching(
        &self,
        class: &str,
        field: &str,
        value: &JsonValue,
    ) -> StoreResult<Option<EntityBox>> {
        let rows = self.rows.read()?;
        Ok(rows.get(class).and_then(|entities| {
            entities
                .iter()
                .find(|e| Self::scalar_of(e, field).as_ref() == Some(value))
                .map(|e| e.clone_boxed())
        }))
    }

    fn find_all_matching(
        &self,
        class: &str,
        field: &str,
        values: &[JsonValue],
    ) -> StoreResult<Vec<EntityBox>> {
        let rows = self.rows.read()?;
        Ok(rows
            .get(class)
            .map(|entities| {
                entities
                    .iter()
                    .filter(|e| {
                        Self::scalar_of(e, field)
                            .map(|v| values.contains(&v))
                            .unwrap_or(false)
                    })
                    .map(|e| e.clone_boxed())
                    .collect()
            })
            .unwrap_or_default())
    }
}
