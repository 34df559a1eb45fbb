//! Resource descriptors and response shaping.
//!
//! Any JSON response is turned into an ordered list of named resources:
//!
//! 1. An array yields one resource per element.
//! 2. An object with a `resources` array yields one resource per element of it.
//! 3. Any other object yields one resource per top-level key.
//! 4. A scalar yields a single `Response` resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name given to a scalar response.
const SCALAR_NAME: &str = "Response";

/// A named unit of data derived from an API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Display name.
    pub name: String,
    /// The resource's data.
    pub data: Value,
}

impl ResourceDescriptor {
    /// Creates a descriptor.
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Derives resource descriptors from an arbitrary JSON value.
pub fn shape_resources(value: &Value) -> Vec<ResourceDescriptor> {
    match value {
        Value::Array(items) => shape_sequence(items),
        Value::Object(map) => match map.get("resources") {
            Some(Value::Array(items)) => shape_sequence(items),
            _ => map
                .iter()
                .map(|(key, data)| ResourceDescriptor::new(key.clone(), data.clone()))
                .collect(),
        },
        scalar => vec![ResourceDescriptor::new(SCALAR_NAME, scalar.clone())],
    }
}

fn shape_sequence(items: &[Value]) -> Vec<ResourceDescriptor> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let name = element_name(item).unwrap_or_else(|| format!("Resource {}", index + 1));
            ResourceDescriptor::new(name, item.clone())
        })
        .collect()
}

fn element_name(item: &Value) -> Option<String> {
    match item.get("name")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(value: &Value) -> Vec<String> {
        shape_resources(value).into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_array_elements_are_numbered() {
        let shaped = shape_resources(&json!([{"a": 1}, {"a": 2}]));
        assert_eq!(shaped.len(), 2);
        assert_eq!(shaped[0], ResourceDescriptor::new("Resource 1", json!({"a": 1})));
        assert_eq!(shaped[1], ResourceDescriptor::new("Resource 2", json!({"a": 2})));
    }

    #[test]
    fn test_array_elements_use_name_field() {
        let value = json!([{"name": "Lamp"}, {"id": 7}, {"name": ""}, "plain"]);
        assert_eq!(names(&value), ["Lamp", "Resource 2", "Resource 3", "Resource 4"]);
    }

    #[test]
    fn test_nested_resources_array() {
        let shaped = shape_resources(&json!({"resources": [{"id": 1}], "total": 1}));
        assert_eq!(shaped, vec![ResourceDescriptor::new("Resource 1", json!({"id": 1}))]);
    }

    #[test]
    fn test_resources_that_is_not_an_array_is_a_key() {
        assert_eq!(names(&json!({"resources": "none", "x": 1})), ["resources", "x"]);
    }

    #[test]
    fn test_object_keys_keep_order() {
        let value: Value = serde_json::from_str(r#"{"y": 2, "x": 1}"#).unwrap();
        let shaped = shape_resources(&value);
        assert_eq!(shaped[0], ResourceDescriptor::new("y", json!(2)));
        assert_eq!(shaped[1], ResourceDescriptor::new("x", json!(1)));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(
            shape_resources(&json!("hello")),
            vec![ResourceDescriptor::new("Response", json!("hello"))]
        );
        assert_eq!(shape_resources(&Value::Null).len(), 1);
        assert_eq!(shape_resources(&json!(42))[0].name, "Response");
    }

    #[test]
    fn test_empty_collections() {
        assert!(shape_resources(&json!([])).is_empty());
        assert!(shape_resources(&json!({})).is_empty());
    }
}
