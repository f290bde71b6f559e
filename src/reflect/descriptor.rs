//! Class and property descriptors.
//!
//! A descriptor is the introspectable shape of a class: its fully qualified
//! name, the namespace it lives in, its source-level imports, and its
//! properties in declaration order. Properties carry the inline type hint
//! (the documented "variable type", optionally suffixed with `[]`), any
//! structured annotation names attached to them, and a captured default
//! value. This is all the reflective metadata inferencer ever gets to see.

use serde_json::Value as JsonValue;

/// One declared property of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Inline type hint, possibly carrying a trailing `[]` array marker.
    pub type_hint: Option<String>,
    /// Fully qualified names of structured annotations attached to the
    /// property.
    pub annotations: Vec<String>,
    /// Compile-time default value, captured as a loose JSON value.
    pub default: Option<JsonValue>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
            annotations: Vec::new(),
            default: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.type_hint = Some(hint.into());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn with_default(mut self, default: JsonValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Declaration-ordered view of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    /// Fully qualified class name (`namespace::Ident`).
    pub class_name: String,
    pub namespace: String,
    /// Fully qualified names imported by the declaring source file.
    pub imports: Vec<String>,
    pub properties: Vec<PropertyDescriptor>,
}

impl ClassDescriptor {
    pub fn new(namespace: impl Into<String>, ident: &str) -> Self {
        let namespace = namespace.into();
        let class_name = if namespace.is_empty() {
            ident.to_string()
        } else {
            format!("{namespace}::{ident}")
        };
        Self {
            class_name,
            namespace,
            imports: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Property names in declaration order.
    pub fn property_names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }
}
