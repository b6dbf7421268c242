//! Core types used throughout Gridkeeper
//!
//! Records travel as opaque JSON objects. The only structure the console
//! relies on is the identifier field, which every entity type names in its
//! descriptor.

use crate::error::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// Identifier
// ============================================================================

/// Stable identifier of a record
///
/// Most entity types use a numeric `id`; some use a natural key chosen by a
/// human (a `username`, a division `code`). The console never invents one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric surrogate key
    Number(i64),
    /// Natural key
    Key(String),
}

impl Identifier {
    /// Read an identifier from a JSON scalar
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Identifier::Number),
            Value::String(s) if !s.is_empty() => Some(Identifier::Key(s.clone())),
            _ => None,
        }
    }

    /// Parse operator input; all-digit input becomes a numeric identifier
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Identifier::Number(n),
            Err(_) => Identifier::Key(trimmed.to_string()),
        }
    }

    /// Convert back into a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            Identifier::Number(n) => Value::from(*n),
            Identifier::Key(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Key(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Identifier::Number(n)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::Key(s.to_string())
    }
}

// ============================================================================
// EntityRecord
// ============================================================================

/// One row's data as returned by the backend
///
/// Field order follows the underlying map, which is alphabetical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRecord(Map<String, Value>);

impl EntityRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing JSON map
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Convert a JSON value, which must be an object
    pub fn from_value(value: Value) -> ConsoleResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConsoleError::NotAnObject(kind_of(&other).to_string())),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field value, returning the previous one
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Remove a field
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Check whether a field is present
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Field names in map order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read the identifier stored under `id_field`
    pub fn identifier(&self, id_field: &str) -> Option<Identifier> {
        self.0.get(id_field).and_then(Identifier::from_value)
    }

    /// Read the identifier or fail
    pub fn require_identifier(&self, id_field: &str) -> ConsoleResult<Identifier> {
        self.identifier(id_field)
            .ok_or_else(|| ConsoleError::MissingIdentifier(id_field.to_string()))
    }

    /// Array-valued field as a slice (missing or non-array yields `None`)
    pub fn array(&self, field: &str) -> Option<&[Value]> {
        match self.0.get(field) {
            Some(Value::Array(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Truthiness of a boolean field (missing counts as false)
    pub fn flag(&self, field: &str) -> bool {
        matches!(self.0.get(field), Some(Value::Bool(true)))
    }

    /// Copy of `self` with every field of `overlay` written over it
    pub fn merged_with(&self, overlay: &EntityRecord) -> EntityRecord {
        let mut merged = self.0.clone();
        for (key, value) in &overlay.0 {
            merged.insert(key.clone(), value.clone());
        }
        EntityRecord(merged)
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying map
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Take the record as a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for EntityRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Display text for a scalar value as it would appear in a cell
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_identifier_from_value() {
        assert_eq!(Identifier::from_value(&json!(7)), Some(Identifier::Number(7)));
        assert_eq!(
            Identifier::from_value(&json!("jdoe")),
            Some(Identifier::Key("jdoe".into()))
        );
        assert_eq!(Identifier::from_value(&json!("")), None);
        assert_eq!(Identifier::from_value(&json!(null)), None);
    }

    #[test]
    fn test_identifier_parse() {
        assert_eq!(Identifier::parse(" 42 "), Identifier::Number(42));
        assert_eq!(Identifier::parse("D1"), Identifier::Key("D1".into()));
        assert_eq!(Identifier::Number(42).to_string(), "42");
    }

    #[test]
    fn test_record_from_value_rejects_non_objects() {
        let err = EntityRecord::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err.to_string(), "Expected a JSON object, found an array");
    }

    #[test]
    fn test_record_identifier() {
        let record = EntityRecord::new().with("username", "jdoe").with("id", 3);
        assert_eq!(record.identifier("username"), Some(Identifier::from("jdoe")));
        assert_eq!(record.identifier("id"), Some(Identifier::Number(3)));
        assert!(record.require_identifier("code").is_err());
    }

    #[test]
    fn test_merged_with_overlays_fields() {
        let original = EntityRecord::new()
            .with("id", 1)
            .with("name", "Old")
            .with("users", json!([{"username": "a"}]));
        let response = EntityRecord::new().with("id", 1).with("name", "New");

        let merged = original.merged_with(&response);
        assert_eq!(merged.get("name"), Some(&json!("New")));
        assert_eq!(merged.array("users").map(|u| u.len()), Some(1));
    }

    #[test]
    fn test_field_names_are_alphabetical() {
        let record = EntityRecord::new().with("name", "x").with("id", 1).with("code", "c");
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["code", "id", "name"]);
    }

    #[test]
    fn test_display_scalar() {
        assert_eq!(display_scalar(&json!(null)), "");
        assert_eq!(display_scalar(&json!("x")), "x");
        assert_eq!(display_scalar(&json!(3)), "3");
    }
}
