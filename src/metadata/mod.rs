//! Metadata Module
//!
//! Per-class field/association/identifier knowledge behind one seam:
//!
//! - `provider.rs` - the `ClassMetadata` / `MetadataProvider` traits
//! - `reflection.rs` - introspection-only inferencer (no relationships)
//! - `schema.rs` - explicit schema-backed provider

mod provider;
mod reflection;
mod schema;

pub use provider::{ClassMetadata, MetadataProvider};
pub use reflection::{ReflectionMetadata, ReflectionProvider};
pub use schema::{
    AssociationKind, AssociationMapping, ClassSchema, FieldMapping, SchemaRegistry,
};
