//! Data models shared between the client and the UI.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

/// A single cell value as returned by the database.
///
/// Rows are heterogeneous maps, so every cell carries its own tag. Column
/// order is never taken from a row; callers keep it as a separate sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Array(Vec<FieldValue>),
    Object(IndexMap<String, FieldValue>),
}

/// One result row: column name to value.
pub type Row = IndexMap<String, FieldValue>;

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert back into a JSON value (used for clipboard export).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Integer(i) => serde_json::Value::from(*i),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(f.to_string())),
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Boolean(b) => serde_json::Value::Bool(*b),
            FieldValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(FieldValue::to_json).collect())
            }
            FieldValue::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(items) => {
                FieldValue::Array(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Object(
                map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
            ),
        }
    }
}

/// Display form used by the grid and the record detail dialog.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "NULL"),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Array(_) | FieldValue::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

/// Whether a DDL column type should be treated as numeric (right-aligned).
pub fn is_numeric_type(type_name: &str) -> bool {
    let upper = type_name.to_ascii_uppercase();
    ["INTEGER", "LONG", "DOUBLE", "FLOAT", "NUMBER"]
        .iter()
        .any(|t| upper.contains(t))
}

/// Secondary index descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: String,
    pub field_names: Vec<String>,
}

/// Schema information for one table: the authoritative DDL and its indexes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableDetails {
    pub ddl: String,
    pub indexes: Vec<IndexInfo>,
    /// DDL of each ancestor table, outermost first. Empty for top-level tables.
    pub ancestor_ddls: Vec<(String, String)>,
}

// === Wire payloads ===

#[derive(Debug, Deserialize)]
pub(crate) struct TableCollection {
    #[serde(default)]
    pub items: Vec<TableSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableSummary {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TablePayload {
    #[serde(default)]
    pub ddl_statement: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexCollection {
    #[serde(default)]
    pub items: Vec<IndexPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexPayload {
    pub name: String,
    #[serde(default)]
    pub keys: Vec<IndexKeyPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexKeyPayload {
    pub column_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreparedPayload {
    pub statement: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResultCollection {
    #[serde(default)]
    pub items: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl From<IndexPayload> for IndexInfo {
    fn from(payload: IndexPayload) -> Self {
        IndexInfo {
            name: payload.name,
            field_names: payload.keys.into_iter().map(|k| k.column_name).collect(),
        }
    }
}
