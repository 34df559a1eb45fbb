//! CSV export of resource collections.

use serde_json::Value;

use crate::error::CoreError;

/// Exports an array of objects as CSV.
///
/// The header row is the union of all keys in first-seen order. Every
/// non-null cell is quoted with embedded quotes doubled; nested objects and
/// arrays are written as JSON. Missing keys and nulls become empty cells.
///
/// # Errors
///
/// Returns [`CoreError::InvalidData`] if `data` is not an array.
pub fn export_csv(data: &Value) -> Result<String, CoreError> {
    let Value::Array(items) = data else {
        return Err(CoreError::InvalidData(
            "only arrays can be exported as CSV".to_string(),
        ));
    };

    let mut headers: Vec<&str> = Vec::new();
    for item in items {
        if let Value::Object(fields) = item {
            for key in fields.keys() {
                if !headers.contains(&key.as_str()) {
                    headers.push(key);
                }
            }
        }
    }

    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(headers.join(","));
    for item in items {
        let row: Vec<String> = headers
            .iter()
            .map(|header| item.get(*header).map(cell).unwrap_or_default())
            .collect();
        lines.push(row.join(","));
    }

    Ok(lines.join("\n"))
}

fn cell(value: &Value) -> String {
    let raw = match value {
        Value::Null => return String::new(),
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) | Value::Bool(_) | Value::Number(_) => value.to_string(),
    };
    format!("\"{}\"", raw.replace('"', "\"\""))
}

// ============================================================================
// Tests
// ============================================================================
