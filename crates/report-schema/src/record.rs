//! Raw Record Extraction
//!
//! One JSON object per reported incident. Extraction enforces the coarse
//! types the schema promises (text vs number); anything stricter is the
//! frame builder's job.

use crate::error::SchemaError;
use crate::schema::ReportSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One crime report, immutable once received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Incident date/time, unparsed
    pub timestamp: String,
    /// Crime category (label)
    pub category: String,
    /// Day-of-week label
    pub day_of_week: String,
    /// Police district label
    pub district: String,
    /// Longitude
    pub x: f64,
    /// Latitude
    pub y: f64,
}

impl RawRecord {
    /// Extract a record from a parsed JSON value using the schema's column names
    pub fn from_json(value: &Value, schema: &ReportSchema) -> Result<Self, SchemaError> {
        let object = value
            .as_object()
            .ok_or_else(|| SchemaError::Malformed(format!("expected object, got {}", type_name(value))))?;

        Ok(Self {
            timestamp: require_text(object, &schema.timestamp)?,
            category: require_text(object, &schema.category)?,
            day_of_week: require_text(object, &schema.day_of_week)?,
            district: require_text(object, &schema.district)?,
            x: require_number(object, &schema.x)?,
            y: require_number(object, &schema.y)?,
        })
    }
}

fn require_text(
    object: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<String, SchemaError> {
    let value = object
        .get(field)
        .ok_or_else(|| SchemaError::MissingField(field.to_string()))?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SchemaError::WrongType {
            field: field.to_string(),
            expected: "text",
            actual: type_name(value),
        })
}

fn require_number(
    object: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<f64, SchemaError> {
    let value = object
        .get(field)
        .ok_or_else(|| SchemaError::MissingField(field.to_string()))?;
    value.as_f64().ok_or_else(|| SchemaError::WrongType {
        field: field.to_string(),
        expected: "number",
        actual: type_name(value),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
