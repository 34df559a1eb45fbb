//! Display fields extracted from a resource for sharing.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resource::ResourceDescriptor;

const TITLE_KEYS: &[&str] = &["name", "title", "nombre", "titulo"];
const REFERENCE_KEYS: &[&str] = &["referencia", "reference", "ref", "sku"];
const PRICE_KEYS: &[&str] = &["precio", "price"];
const DESCRIPTION_KEYS: &[&str] = &["descripcion", "description"];
const ID_KEYS: &[&str] = &["id"];
const IMAGE_KEYS: &[&str] = &["imagen", "image", "image_url", "url_imagen", "imageurl"];

const CLOSING_LINE: &str = "✅ Product available in our catalog.";

/// Fields of a resource shown when it is shared to a messaging app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    /// Card title.
    pub title: String,
    /// Reference code.
    pub reference: Option<String>,
    /// Price, as displayed.
    pub price: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Resource id.
    pub id: Option<String>,
    /// Image URL, if the resource has one.
    pub image_url: Option<String>,
}

impl SharePayload {
    /// Extracts the display fields of `resource`.
    ///
    /// Keys are matched case-insensitively. The title falls back to the
    /// descriptor name when the data carries none.
    pub fn from_descriptor(resource: &ResourceDescriptor) -> Self {
        let Some(fields) = resource.data.as_object() else {
            return Self {
                title: resource.name.clone(),
                ..Default::default()
            };
        };

        Self {
            title: lookup(fields, TITLE_KEYS).unwrap_or_else(|| resource.name.clone()),
            reference: lookup(fields, REFERENCE_KEYS),
            price: lookup(fields, PRICE_KEYS),
            description: lookup(fields, DESCRIPTION_KEYS),
            id: lookup(fields, ID_KEYS),
            image_url: lookup(fields, IMAGE_KEYS),
        }
    }

    /// Renders the chat message for this payload.
    pub fn compose_message(&self) -> String {
        let mut message = format!("*{}*\n\n", self.title);
        let lines = [
            ("📋 Reference", &self.reference),
            ("💰 Price", &self.price),
            ("📝 Description", &self.description),
            ("🆔 ID", &self.id),
        ];
        for (label, value) in lines {
            if let Some(value) = value {
                let _ = writeln!(message, "{label}: {value}");
            }
        }
        message.push('\n');
        message.push_str(CLOSING_LINE);
        message
    }
}

fn lookup(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter(|(key, _)| keys.iter().any(|k| key.eq_ignore_ascii_case(k)))
        .find_map(|(_, value)| display_value(value))
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
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

    #[test]
    fn test_extracts_fields() {
        let resource = ResourceDescriptor::new(
            "Resource 1",
            json!({
                "Nombre": "Desk Lamp",
                "referencia": "LMP-01",
                "precio": 19.5,
                "descripcion": "  Warm light ",
                "id": 42,
                "imagen": "https://cdn.example.com/MyFiles/lamp.jpg"
            }),
        );

        let payload = SharePayload::from_descriptor(&resource);
        assert_eq!(payload.title, "Desk Lamp");
        assert_eq!(payload.reference.as_deref(), Some("LMP-01"));
        assert_eq!(payload.price.as_deref(), Some("19.5"));
        assert_eq!(payload.description.as_deref(), Some("Warm light"));
        assert_eq!(payload.id.as_deref(), Some("42"));
        assert_eq!(
            payload.image_url.as_deref(),
            Some("https://cdn.example.com/MyFiles/lamp.jpg")
        );
    }

    #[test]
    fn test_title_falls_back_to_descriptor_name() {
        let payload = SharePayload::from_descriptor(&ResourceDescriptor::new("stock", json!(12)));
        assert_eq!(payload.title, "stock");
        assert!(payload.reference.is_none());

        let payload =
            SharePayload::from_descriptor(&ResourceDescriptor::new("Resource 3", json!({"id": 3})));
        assert_eq!(payload.title, "Resource 3");
    }

    #[test]
    fn test_compose_message_skips_missing_fields() {
        let payload = SharePayload {
            title: "Desk Lamp".to_string(),
            price: Some("19.5".to_string()),
            id: Some("42".to_string()),
            ..Default::default()
        };

        assert_eq!(
            payload.compose_message(),
            "*Desk Lamp*\n\n💰 Price: 19.5\n🆔 ID: 42\n\n✅ Product available in our catalog."
        );
    }
}
