//! JSON column storage.
//!
//! The JSON column is Postgres-only: it is stored as `json` and the driver
//! decodes it before the field's read hook sees it. The helpers here cover
//! the encode/decode steps for callers that move raw column text.

use bigfields_core::{FieldError, FieldResult};

use crate::connection::{Connection, Engine};
use crate::value::Value;

/// Returns the column type of a [`FieldType::JsonField`](crate::fields::FieldType::JsonField).
pub fn db_type(connection: &Connection) -> FieldResult<String> {
    match &connection.engine {
        Engine::Postgres => Ok("json".to_string()),
        other => {
            tracing::warn!(engine = %other, "JSON columns are only available on Postgres");
            Err(FieldError::UnsupportedEngine(format!(
                "{other} has no JSONField column type"
            )))
        }
    }
}

/// Encodes a logical value into the JSON text written to the column.
/// `Null` stays `Null` so the column holds SQL NULL rather than `null`.
pub fn get_prep_value(value: &Value) -> FieldResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let json = to_json(value)?;
    serde_json::to_string(&json)
        .map(Value::String)
        .map_err(|e| FieldError::SerializationError(e.to_string()))
}

/// Decodes column text into a [`Value::Json`].
pub fn from_db_value(text: &str) -> FieldResult<Value> {
    serde_json::from_str(text).map(Value::Json).map_err(|e| {
        tracing::debug!(error = %e, "stored JSON could not be decoded");
        FieldError::ValidationError(
            bigfields_core::ValidationError::new("Enter valid JSON.", "invalid")
                .with_param("error", e.to_string()),
        )
    })
}

fn to_json(value: &Value) -> FieldResult<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| {
                FieldError::SerializationError(format!("{f} is not representable in JSON"))
            })?,
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Json(j) => j.clone(),
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect::<FieldResult<_>>()?)
        }
        Value::Bytes(_) => {
            return Err(FieldError::SerializationError(
                "binary values are not JSON serializable".to_string(),
            ))
        }
    })
}
