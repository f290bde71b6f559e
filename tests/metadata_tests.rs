mod common;

use common::{registry, ClassicObject, TestEntity};
use entitymerge::{MetadataProvider, ReflectClass, ReflectionProvider};

#[test]
fn reflection_sees_every_declared_property() {
    let provider = ReflectionProvider::with_registry(registry());
    let object = ClassicObject::default();
    let meta = provider.metadata_for(&object);

    assert_eq!(meta.class_name(), "fixtures::ClassicObject");
    assert!(meta.has_field("commented_field"));
    assert!(meta.has_field("not_mapped"));
    assert!(!meta.has_field("absent"));
    assert_eq!(
        meta.field_names(),
        vec![
            "id",
            "commented_field",
            "defaulted_field",
            "both_commented_and_defaulted",
            "object_field",
            "class_field",
            "class_collection",
            "external_class",
            "date",
            "not_mapped",
        ]
    );
}

#[test]
fn field_types_resolve_through_the_hint_ladder() {
    let provider = ReflectionProvider::with_registry(registry());
    let meta = provider.metadata_for_class(ClassicObject::CLASS_NAME);

    for (field, expected) in [
        // No hint, no default.
        ("id", None),
        // Inline primitive hints.
        ("commented_field", Some("string")),
        ("both_commented_and_defaulted", Some("integer")),
        ("object_field", Some("object")),
        // No hint, typed from the captured default value.
        ("defaulted_field", Some("array")),
        // Fully qualified registered class.
        ("class_field", Some("fixtures::ClassicObject")),
        // Short class name plus the collection marker, resolved in the
        // declaring namespace.
        ("class_collection", Some("fixtures::ClassicObject")),
        // Short name resolved through the source imports.
        ("external_class", Some("fixtures::downed::DownedEntity")),
        // Short name resolved through the property annotations.
        ("date", Some("validator::constraints::DateTime")),
        ("not_mapped", None),
    ] {
        assert_eq!(meta.type_of_field(field).as_deref(), expected, "field {field}");
    }
}

#[test]
fn unregistered_objects_still_reflect_from_their_own_descriptor() {
    let provider = ReflectionProvider::new();
    let object = ClassicObject::default();
    let meta = provider.metadata_for(&object);

    assert!(meta.has_field("commented_field"));
    assert_eq!(meta.type_of_field("commented_field").as_deref(), Some("string"));
    // Class-like hints need the registry, so they come up empty here.
    assert_eq!(meta.type_of_field("class_field"), None);
}

#[test]
fn reflection_has_no_concept_of_associations_or_identifiers() {
    let provider = ReflectionProvider::with_registry(registry());
    let meta = provider.metadata_for_class(TestEntity::CLASS_NAME);

    assert!(!meta.has_association("many_to_one"));
    assert!(!meta.is_identifier("id"));
    assert_eq!(meta.single_identifier_field_name(), None);
    assert!(meta.association_names().is_empty());
}

#[test]
fn registry_constructs_registered_classes() {
    let registry = registry();
    assert!(registry.contains(TestEntity::CLASS_NAME));
    assert!(!registry.contains("fixtures::Nope"));

    let entity = registry
        .construct(TestEntity::CLASS_NAME)
        .expect("registered class");
    assert_eq!(entity.class_name(), "fixtures::entity::TestEntity");
}
