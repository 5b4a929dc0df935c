use crate::value::Value;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved field name that addresses the record identifier in the
/// declarative filter language.
pub const ID_FIELD: &str = "_id";

///
/// RecordId
///
/// Store-facing record identifier. Travels in the key path, never in the
/// flat property set.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier form of a field value. Text passes through; integers
    /// are rendered in decimal, the way untyped callers address records
    /// by numeric ids. Other values have no identifier form.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(Self(s.clone())),
            Value::Int(i) => Some(Self(i.to_string())),
            Value::Uint(u) => Some(Self(u.to_string())),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

///
/// Record
///
/// A transient application record: optional identifier plus a canonical
/// field map. The identifier is carried beside the fields, not inside
/// them; a literal `_id` field left in the map is resolved at encode
/// time.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    id: Option<RecordId>,
    fields: BTreeMap<String, Value>,
}

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id: None,
            fields: BTreeMap::new(),
        }
    }

    /// Attach the identifier, replacing any previous one.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub(crate) fn from_parts(id: Option<RecordId>, fields: BTreeMap<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Set one field, replacing any previous value.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn set_id(&mut self, id: impl Into<RecordId>) {
        self.id = Some(id.into());
    }

    #[must_use]
    pub const fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (Option<RecordId>, BTreeMap<String, Value>) {
        (self.id, self.fields)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_previous_value() {
        let record = Record::new().set("age", 30i64).set("age", 31i64);

        assert_eq!(record.get("age"), Some(&Value::Int(31)));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn with_id_carries_identifier_beside_fields() {
        let record = Record::new().with_id("7").set("name", "bob");

        assert_eq!(record.id().map(RecordId::as_str), Some("7"));
        assert!(record.get(ID_FIELD).is_none());
    }

    #[test]
    fn record_id_from_value_renders_integers() {
        assert_eq!(
            RecordId::from_value(&Value::Int(-3)),
            Some(RecordId::new("-3"))
        );
        assert_eq!(
            RecordId::from_value(&Value::Uint(42)),
            Some(RecordId::new("42"))
        );
        assert_eq!(
            RecordId::from_value(&Value::text("u1")),
            Some(RecordId::new("u1"))
        );
        assert_eq!(RecordId::from_value(&Value::Bool(true)), None);
        assert_eq!(RecordId::from_value(&Value::Null), None);
    }
}
