//! Class registry.
//!
//! Maps fully qualified class names to their descriptors and default
//! constructors. The registry answers the "is this a loadable class"
//! question during type-hint resolution and builds fresh relation targets
//! for the merge strategy.

use std::collections::HashMap;

use super::descriptor::ClassDescriptor;
use super::object::ReflectClass;
use super::value::EntityBox;

struct RegisteredClass {
    descriptor: ClassDescriptor,
    construct: fn() -> EntityBox,
}

fn construct_default<T: ReflectClass>() -> EntityBox {
    Box::new(T::default())
}

#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<String, RegisteredClass>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: ReflectClass>(&mut self) -> &mut Self {
        let descriptor = T::class_descriptor();
        self.classes.insert(
            descriptor.class_name.clone(),
            RegisteredClass {
                descriptor,
                construct: construct_default::<T>,
            },
        );
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn descriptor(&self, class: &str) -> Option<&ClassDescriptor> {
        self.classes.get(class).map(|c| &c.descriptor)
    }

    /// Builds a default instance of a registered class.
    pub fn construct(&self, class: &str) -> Option<EntityBox> {
        self.classes.get(class).map(|c| (c.construct)())
    }

    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.keys().cloned().collect();
        names.sort();
        names
    }
}
