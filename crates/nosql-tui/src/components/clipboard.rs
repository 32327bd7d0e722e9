//! Clipboard operations.
//!
//! Rows are copied as pretty-printed JSON with keys in display order.
//! The system clipboard is only opened when something is copied.

use arboard::Clipboard;
use indexmap::IndexMap;
use nosql_core::api::Row;

use crate::error::TuiError;

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), TuiError> {
    let mut clipboard = Clipboard::new()
        .map_err(|e| TuiError::Clipboard(format!("Failed to access clipboard: {}", e)))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| TuiError::Clipboard(format!("Failed to copy: {}", e)))
}

/// Serialize `row` as an indented JSON object.
///
/// Keys follow `columns`; any key of the row not listed there is appended
/// in the row's own order.
pub fn format_record_json(columns: &[String], row: &Row) -> String {
    let mut obj: IndexMap<String, serde_json::Value> = IndexMap::new();
    for column in columns {
        if let Some(value) = row.get(column) {
            obj.insert(column.clone(), value.to_json());
        }
    }
    for (key, value) in row {
        if !obj.contains_key(key) {
            obj.insert(key.clone(), value.to_json());
        }
    }
    serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosql_core::api::FieldValue;

    #[test]
    fn test_format_record_json_uses_display_order() {
        let mut row = Row::new();
        row.insert("id".to_string(), FieldValue::Integer(7));
        row.insert("name".to_string(), FieldValue::String("Ann".to_string()));
        row.insert("extra".to_string(), FieldValue::Null);

        let json = format_record_json(&["name".to_string(), "id".to_string()], &row);
        assert_eq!(
            json,
            "{\n  \"name\": \"Ann\",\n  \"id\": 7,\n  \"extra\": null\n}"
        );
    }

    #[test]
    fn test_format_record_json_without_order() {
        let mut row = Row::new();
        row.insert("b".to_string(), FieldValue::Boolean(true));
        row.insert("a".to_string(), FieldValue::Float(1.5));

        let json = format_record_json(&[], &row);
        assert_eq!(json, "{\n  \"b\": true,\n  \"a\": 1.5\n}");
    }
}
