//! Merge directives.
//!
//! A directive tells the engine how one external data key maps onto the
//! target object: which property to write (`object_field`, defaulting to
//! the data key itself) and which sub-key of an association value
//! identifies the related entity (`pivot`, defaulting to the related
//! class's identifier field).
//!
//! Directive params are permissive at the boundary: a structured spec, a
//! JSON-encoded string of one, or any truthy marker meaning "use defaults".
//! Anything that fails to decode degrades to the default spec.

use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Normalized per-field merge instruction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectiveSpec {
    /// Property to write on the target; the data key when absent.
    #[serde(alias = "object_field")]
    pub object_field: Option<String>,
    /// Sub-key of the incoming association value naming the lookup field.
    pub pivot: Option<String>,
}

impl DirectiveSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spec that renames the external key onto another property.
    pub fn renamed(object_field: impl Into<String>) -> Self {
        Self {
            object_field: Some(object_field.into()),
            pivot: None,
        }
    }

    pub fn with_pivot(mut self, pivot: impl Into<String>) -> Self {
        self.pivot = Some(pivot.into());
        self
    }

    /// Normalizes loose directive params into a spec.
    ///
    /// Strings are decoded as JSON first; non-object results (booleans,
    /// numbers, null, malformed text) all mean "use defaults".
    pub fn from_raw(raw: &JsonValue) -> Self {
        let candidate = match raw {
            JsonValue::String(text) => match serde_json::from_str::<JsonValue>(text) {
                Ok(decoded) => decoded,
                Err(_) => {
                    log::warn!("directive params {text:?} are not valid JSON, using defaults");
                    return Self::default();
                }
            },
            other => other.clone(),
        };
        match candidate {
            JsonValue::Object(_) => {
                serde_json::from_value(candidate).unwrap_or_else(|err| {
                    log::warn!("directive params do not form a spec ({err}), using defaults");
                    Self::default()
                })
            }
            _ => Self::default(),
        }
    }
}

/// Insertion-ordered directive set; processing order is the order keys were
/// added, which matters because failures do not roll back earlier fields.
#[derive(Debug, Clone, Default)]
pub struct Directives {
    entries: Vec<(String, DirectiveSpec)>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, spec: DirectiveSpec) -> Self {
        self.entries.push((key.into(), spec));
        self
    }

    /// Inserts a directive from loose params, normalizing at the boundary.
    pub fn insert_raw(self, key: impl Into<String>, raw: impl Into<JsonValue>) -> Self {
        let spec = DirectiveSpec::from_raw(&raw.into());
        self.insert(key, spec)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DirectiveSpec)> {
        self.entries.iter().map(|(key, spec)| (key.as_str(), spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_params_decode() {
        let spec = DirectiveSpec::from_raw(&json!({"objectField": "commented_field"}));
        assert_eq!(spec.object_field.as_deref(), Some("commented_field"));
        assert_eq!(spec.pivot, None);

        let snake = DirectiveSpec::from_raw(&json!({"object_field": "x", "pivot": "uuid"}));
        assert_eq!(snake.object_field.as_deref(), Some("x"));
        assert_eq!(snake.pivot.as_deref(), Some("uuid"));
    }

    #[test]
    fn json_encoded_params_decode() {
        let spec = DirectiveSpec::from_raw(&json!(r#"{"pivot": "slug"}"#));
        assert_eq!(spec.pivot.as_deref(), Some("slug"));
        assert_eq!(spec.object_field, None);
    }

    #[test]
    fn truthy_markers_mean_defaults() {
        for raw in [json!(true), json!(1), json!(null), json!([1, 2])] {
            assert_eq!(DirectiveSpec::from_raw(&raw), DirectiveSpec::default());
        }
    }

    #[test]
    fn malformed_params_degrade_to_defaults() {
        assert_eq!(
            DirectiveSpec::from_raw(&json!("{not json")),
            DirectiveSpec::default()
        );
        // Decodes to a non-object, so defaults as well.
        assert_eq!(
            DirectiveSpec::from_raw(&json!("42")),
            DirectiveSpec::default()
        );
        // Object with wrongly typed members degrades instead of failing.
        assert_eq!(
            DirectiveSpec::from_raw(&json!({"objectField": 5})),
            DirectiveSpec::default()
        );
    }

    #[test]
    fn directive_order_is_insertion_order() {
        let directives = Directives::new()
            .insert("b", DirectiveSpec::new())
            .insert("a", DirectiveSpec::renamed("other"))
            .insert_raw("c", json!(true));

        let keys: Vec<&str> = directives.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(directives.len(), 3);
        assert!(!directives.is_empty());
    }
}
