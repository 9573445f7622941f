use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record returned by the API: an opaque JSON object whose
/// interesting fields depend on its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wraps a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(MapError::UnexpectedShape(format!(
                "expected a record object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Looks up a dotted path such as `location.latitude`
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.fields.get(first)?, |value, segment| {
            value.as_object()?.get(segment)
        })
    }

    /// Display text for a field. Strings are returned as-is, numbers and
    /// booleans are formatted, null and missing fields yield `None`.
    pub fn text(&self, path: &str) -> Option<String> {
        value_text(self.get(path)?)
    }

    /// Numeric value of a field, accepting numeric strings.
    pub fn number(&self, path: &str) -> Option<f64> {
        match self.get(path)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Child records of an array field (e.g. `inspections`). Non-object
    /// entries are skipped.
    pub fn children(&self, path: &str) -> Vec<Record> {
        self.get(path)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_object().cloned().map(Record::new))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Record identifier, if the API supplied one
    pub fn id(&self) -> Option<String> {
        self.text("id")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Parses an API response body into records. The body must be a JSON array
/// of objects.
pub fn parse_records(body: &[u8]) -> Result<Vec<Record>> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Array(items) => items.into_iter().map(Record::from_value).collect(),
        other => Err(MapError::UnexpectedShape(format!(
            "expected an array of records, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
