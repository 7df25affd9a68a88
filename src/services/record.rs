use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A loosely shaped payload for a single create call.
///
/// Serialization writes fields in the order they were first set. A field set
/// to `None` is present but has no value; it goes over the wire as an
/// explicit `null` instead of being dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Option<Value>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, Some(value.into()));
        self
    }

    /// Declares a field without a value.
    pub fn without(mut self, key: impl Into<String>) -> Self {
        self.set(key, None);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: Option<Value>) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Option<Value>> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Unset fields become `null`. The returned map is ordered by key.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
            .into_iter()
            .map(|(k, v)| (k, v.unwrap_or(Value::Null)))
            .collect()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v.as_ref().unwrap_or(&Value::Null))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .map(|(k, v)| (k, Some(v).filter(|v| !v.is_null())))
            .collect())
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Some(v))).collect(),
        }
    }
}

impl FromIterator<(String, Option<Value>)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Option<Value>)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

/// Serializes any payload into the JSON body sent to the backend.
///
/// Absent values become `null`: `Record` does this for its unset fields and
/// `Option::None` fields of derived structs already serialize as `null`
/// unless they opt out with `skip_serializing_if`.
pub fn sanitize<R: Serialize + ?Sized>(record: &R) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(record)?)
}

