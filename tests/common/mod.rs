#![allow(dead_code)]

use std::sync::Arc;

use entitymerge::metadata::{ClassSchema, SchemaRegistry};
use entitymerge::reflect_object;
use entitymerge::{ClassRegistry, MemoryStore, ReflectClass};
use serde_json::Value as JsonValue;

reflect_object! {
    pub struct ClassicObject {
        namespace: "fixtures",
        imports: ["fixtures::downed::DownedEntity", "validator::constraints::DateTime"],
        fields: {
            id: Option<i64>,
            commented_field: Option<String> as "string",
            defaulted_field: Vec<String> = Vec::new(),
            both_commented_and_defaulted: i64 as "int" = 0,
            object_field: Option<JsonValue> as "object",
            class_field: Option<JsonValue> as "fixtures::ClassicObject",
            class_collection: Option<JsonValue> as "ClassicObject[]",
            external_class: Option<JsonValue> as "DownedEntity",
            date: Option<String> as "DateTime" ["validator::constraints::DateTime"],
            not_mapped: Option<JsonValue>,
        },
    }
}

reflect_object! {
    pub struct TestEntity {
        namespace: "fixtures::entity",
        fields: {
            id: Option<i64>,
            string: Option<String> as "string",
        },
    }
}

reflect_object! {
    pub struct TestEntityWithAssociation {
        namespace: "fixtures::entity",
        fields: {
            id: Option<i64>,
        },
        relations: {
            many_to_one: one TestEntity,
            one_to_many: many TestEntity,
        },
    }
}

pub fn entity_schema() -> ClassSchema {
    ClassSchema::new(TestEntity::CLASS_NAME)
        .identifier("id", "integer")
        .field("string", "string")
}

pub fn association_schema() -> ClassSchema {
    ClassSchema::new(TestEntityWithAssociation::CLASS_NAME)
        .identifier("id", "integer")
        .single_association("many_to_one", TestEntity::CLASS_NAME)
        .collection_association("one_to_many", TestEntity::CLASS_NAME)
}

pub fn provider() -> Arc<SchemaRegistry> {
    Arc::new(
        SchemaRegistry::new()
            .define(entity_schema())
            .define(association_schema()),
    )
}

pub fn registry() -> Arc<ClassRegistry> {
    let mut registry = ClassRegistry::new();
    registry.register::<ClassicObject>();
    registry.register::<TestEntity>();
    registry.register::<TestEntityWithAssociation>();
    Arc::new(registry)
}

pub fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for (id, string) in [(1, "First one."), (2, "Second one."), (3, "Third one.")] {
        store
            .insert(TestEntity {
                id: Some(id),
                string: Some(string.to_string()),
            })
            .unwrap();
    }
    Arc::new(store)
}
