//! Dynamic JSON records and the paginated payload returned by list endpoints.
//!
//! List endpoints return either a bare array of objects or an envelope:
//!
//! ```json
//! { "data": [ { "id": 1, "status": "Active" } ], "meta": { "page": 1, "per_page": 20, "total": 1 } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::LoadError;
use crate::query::PageMeta;
use crate::record::{FieldValue, Record, RecordId};
use crate::schema::Schema;

/// Paginated list payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<Value>),
    Page(PageEnvelope<Value>),
}

/// A record backed by a JSON object, with values coerced to the schema's
/// declared field kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    id: RecordId,
    fields: BTreeMap<String, FieldValue>,
}

impl JsonRecord {
    /// Builds a record from the object at position `index` of a payload.
    pub fn from_object(
        index: usize,
        object: &Map<String, Value>,
        schema: &Schema,
    ) -> Result<Self, LoadError> {
        let id = match object.get(&schema.id_field) {
            Some(Value::Number(n)) if n.is_i64() => n.as_i64().map(RecordId::Int),
            Some(Value::String(s)) if !s.is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
        .ok_or_else(|| LoadError::MissingId {
            index,
            field: schema.id_field.clone(),
        })?;

        let mut fields = BTreeMap::new();
        for (name, raw) in object {
            let value = convert(raw);
            let value = match schema.get(name) {
                Some(spec) => spec
                    .coerce(value)
                    .map_err(|message| LoadError::InvalidValue {
                        index,
                        field: name.clone(),
                        message,
                    })?,
                None => value,
            };
            fields.insert(name.clone(), value);
        }

        Ok(Self { id, fields })
    }

    /// All fields, including ones the schema does not declare.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Record for JsonRecord {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).cloned()
    }
}

fn convert(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(v) => FieldValue::Integer(v),
            None => n
                .as_f64()
                .map(FieldValue::Float)
                .unwrap_or_else(|| FieldValue::Text(n.to_string())),
        },
        Value::String(s) => FieldValue::Text(s.clone()),
        other => FieldValue::Text(other.to_string()),
    }
}

/// Converts an already parsed payload (bare array or envelope) into records.
pub fn records_from_value(
    value: Value,
    schema: &Schema,
) -> Result<(Vec<JsonRecord>, Option<PageMeta>), LoadError> {
    let payload = serde_json::from_value::<Payload>(value).map_err(LoadError::Payload)?;
    records_from_payload(payload, schema)
}

/// Loads records from a JSON file holding a bare array or a page envelope.
pub fn load_records(
    path: &Path,
    schema: &Schema,
) -> Result<(Vec<JsonRecord>, Option<PageMeta>), LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let payload: Payload = serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let (records, meta) = records_from_payload(payload, schema)?;
    debug!("loaded {} records from {}", records.len(), path.display());
    Ok((records, meta))
}

fn records_from_payload(
    payload: Payload,
    schema: &Schema,
) -> Result<(Vec<JsonRecord>, Option<PageMeta>), LoadError> {
    let (items, meta) = match payload {
        Payload::List(items) => (items, None),
        Payload::Page(page) => (page.data, page.meta),
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Value::Object(object) = item else {
            return Err(LoadError::InvalidValue {
                index,
                field: schema.id_field.clone(),
                message: "record is not a JSON object".to_string(),
            });
        };
        records.push(JsonRecord::from_object(index, object, schema)?);
    }
    Ok((records, meta))
}

/// Loads and validates a screen schema from a JSON file.
pub fn load_schema(path: &Path) -> Result<Schema, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let schema: Schema = serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    schema.validate()?;
    Ok(schema)
}
