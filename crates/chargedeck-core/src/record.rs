//! Opaque entity records
//!
//! The console imposes no schema on the entities it manages; rows travel
//! through the controllers and widgets as the JSON objects the backend
//! returned. The only structural requirement is a stable unique id used as
//! the list key and the update/delete target.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single entity row: a mapping from field name to JSON value, passed
/// through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// The record's id under the entity's id field (`"id"` for most
    /// resources, `"userId"` for user aggregates), rendered as a string.
    ///
    /// Numeric ids are formatted without decoration so they round-trip into
    /// URL path segments.
    pub fn id(&self, id_field: &str) -> Option<String> {
        match self.0.get(id_field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A copy of this record without the named fields. Used by the gateway
    /// before `PUT`: the id travels in the URL and the backend rejects
    /// redundant or server-managed fields in the payload.
    pub fn without(&self, fields: &[&str]) -> Self {
        let mut copy = self.0.clone();
        for f in fields {
            copy.remove(*f);
        }
        Self(copy)
    }

    /// Display text for a field value: scalars verbatim, null/missing as
    /// empty, nested structures as compact JSON.
    pub fn display(&self, field: &str) -> String {
        match self.0.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
