// ============================================================================
// EntityMerge Library
// ============================================================================

pub mod core;
pub mod merger;
pub mod metadata;
pub mod reflect;
pub mod serializer;
pub mod store;

// Re-export main types for convenience
pub use self::core::{MergeError, MergeResult};
pub use merger::{AssociationStrategy, DataPayload, DirectiveSpec, Directives, EntityMerger};
pub use metadata::{ClassMetadata, MetadataProvider, ReflectionProvider, SchemaRegistry};
pub use reflect::{ClassRegistry, EntityBox, FieldValue, ReflectClass, ReflectedObject};
pub use serializer::{JsonObjectSerializer, ObjectSerializer};
pub use store::{MemoryStore, ObjectStore};

// Used by the reflect_object! macro expansion.
pub use serde_json;

/// Merges a data map into an object with default directives, using pure
/// reflection and no collaborators.
///
/// # Examples
///
/// ```
/// use entitymerge::{merge, reflect_object};
/// use serde_json::json;
///
/// reflect_object! {
///     pub struct Article {
///         namespace: "demo",
///         fields: {
///             title: Option<String> as "string",
///             views: i64 as "int" = 0,
///         },
///     }
/// }
///
/// # fn main() -> entitymerge::MergeResult<()> {
/// let mut article = Article::default();
/// merge(&mut article, json!({"title": "Hello", "views": 3}))?;
/// assert_eq!(article.title.as_deref(), Some("Hello"));
/// assert_eq!(article.views, 3);
/// # Ok(())
/// # }
/// ```
pub fn merge<'d>(
    target: &mut dyn ReflectedObject,
    data: impl Into<DataPayload<'d>>,
) -> MergeResult<()> {
    EntityMerger::new().merge(target, data)
}
