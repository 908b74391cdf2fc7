//! Source records as delivered by the external store.
//!
//! Physical field names and their presence are not guaranteed, so a record is
//! an ordered map of tagged values rather than a typed struct. Lookup by
//! logical name goes through [`crate::resolve`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A single field value. Numbers keep their JSON form so integers are not
/// widened to floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<FieldValue>),
    Object(IndexMap<String, FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Toggle semantics: `true`, non-zero numbers, affirmative strings and
    /// non-empty lists are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            FieldValue::String(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1" | "enabled"
            ),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Object(map) => !map.is_empty(),
        }
    }

    /// Content semantics: carries something other than blank text or an empty
    /// collection.
    pub fn is_non_empty(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(_) => true,
            FieldValue::String(s) => !s.trim().is_empty(),
            FieldValue::List(items) => items.iter().any(FieldValue::is_non_empty),
            FieldValue::Object(map) => !map.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text rendering for free-form fields. Lists of strings are joined with
    /// `", "` (multi-select fields).
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::List(items) => {
                let parts: Vec<String> = items.iter().filter_map(FieldValue::to_text).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(", "))
                }
            }
            FieldValue::Null | FieldValue::Object(_) => None,
        }
    }

    /// Linked-record reference: the first id of a link list, or a bare id.
    pub fn first_id(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) if !s.trim().is_empty() => Some(s.as_str()),
            FieldValue::List(items) => items.iter().find_map(FieldValue::first_id),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    /// Non-finite values have no JSON form and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// A record owned by the external store. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: String,
    #[serde(default)]
    pub fields: IndexMap<String, FieldValue>,
}

impl SourceRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// The kinds of record the assembler fetches. Backends may map each kind to
/// its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Primary,
    Workflow,
    Entity,
    ContentType,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Primary => "primary",
            RecordKind::Workflow => "workflow",
            RecordKind::Entity => "entity",
            RecordKind::ContentType => "content_type",
        }
    }
}
