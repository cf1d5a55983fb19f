//! Read-time value coercion.
//!
//! [`to_python`] converts a raw stored value into the field's logical value.
//! Failures are [`FieldError::ValidationError`]s; the caller decides whether
//! to reject one record or abort a batch.

use bigfields_core::{FieldError, FieldResult};

use crate::fields::types::{FieldDef, FieldType};
use crate::value::Value;

/// Message raised when a 64-bit identifier cannot be read as an integer.
pub const LONG_INTEGER_MESSAGE: &str = "This value must be a long integer.";

/// Message raised when a host integer column cannot be read as an integer.
pub const INTEGER_MESSAGE: &str = "This value must be an integer.";

/// Converts a raw stored value to the field's logical value.
///
/// - `BigAutoField` / `BigUuidField`: `Null` passes through, anything else
///   is coerced to an integer.
/// - `JsonField`: `Null` on a non-nullable, blank-allowed field becomes an
///   empty object; every other value is returned unchanged.
/// - Relations return the raw value; the registry applies the referenced
///   field's hook.
///
/// # Examples
///
/// ```
/// use bigfields_db::fields::{coercion::to_python, FieldDef, FieldType};
/// use bigfields_db::value::Value;
///
/// let id = FieldDef::new("id", FieldType::BigAutoField);
/// assert_eq!(to_python(&id, Value::from("42")).unwrap(), Value::Int(42));
/// assert!(to_python(&id, Value::from("abc")).is_err());
/// ```
pub fn to_python(field: &FieldDef, value: Value) -> FieldResult<Value> {
    match &field.field_type {
        FieldType::BigAutoField | FieldType::BigUuidField => {
            coerce_integer(field, value, LONG_INTEGER_MESSAGE)
        }
        FieldType::AutoField
        | FieldType::BigIntegerField
        | FieldType::IntegerField
        | FieldType::SmallIntegerField => coerce_integer(field, value, INTEGER_MESSAGE),
        FieldType::JsonField => {
            if value.is_null() && !field.null && field.blank {
                return Ok(Value::Json(serde_json::Value::Object(serde_json::Map::new())));
            }
            Ok(value)
        }
        _ => Ok(value),
    }
}

fn coerce_integer(field: &FieldDef, value: Value, message: &str) -> FieldResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    parse_integer(&value).map(Value::Int).ok_or_else(|| {
        tracing::debug!(field = field.name, kind = value.kind(), "value is not an integer");
        FieldError::invalid_value(message, value.to_string())
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Float(f) => {
            let t = f.trunc();
            (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then(|| t as i64)
        }
        Value::String(s) => s.trim().parse().ok(),
        Value::Bytes(b) => std::str::from_utf8(b).ok()?.trim().parse().ok(),
        Value::Null | Value::Json(_) | Value::List(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fields::types::RelationDef;

    fn big_auto() -> FieldDef {
        FieldDef::new("id", FieldType::BigAutoField).primary_key()
    }

    #[test]
    fn test_big_identifier_null_passes_through() {
        assert_eq!(to_python(&big_auto(), Value::Null).unwrap(), Value::Null);
        let uuid = FieldDef::new("id", FieldType::BigUuidField);
        assert_eq!(to_python(&uuid, Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_big_identifier_coerces_strings() {
        assert_eq!(to_python(&big_auto(), Value::from("42")).unwrap(), Value::Int(42));
        assert_eq!(to_python(&big_auto(), Value::from(" -7 ")).unwrap(), Value::Int(-7));
        assert_eq!(
            to_python(&big_auto(), Value::from("9223372036854775807")).unwrap(),
            Value::Int(i64::MAX)
        );
    }

    #[test]
    fn test_big_identifier_coerces_other_scalars() {
        assert_eq!(to_python(&big_auto(), Value::Int(5)).unwrap(), Value::Int(5));
        assert_eq!(to_python(&big_auto(), Value::Float(3.9)).unwrap(), Value::Int(3));
        assert_eq!(to_python(&big_auto(), Value::Bool(true)).unwrap(), Value::Int(1));
        assert_eq!(
            to_python(&big_auto(), Value::Bytes(b"12".to_vec())).unwrap(),
            Value::Int(12)
        );
    }

    #[test]
    fn test_big_identifier_rejects_non_numeric() {
        let err = to_python(&big_auto(), Value::from("abc")).unwrap_err();
        assert!(err.is_invalid_value());
        match err {
            FieldError::ValidationError(inner) => {
                assert_eq!(inner.message, LONG_INTEGER_MESSAGE);
                assert_eq!(inner.code, "invalid");
                assert_eq!(inner.params["value"], "abc");
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_big_identifier_rejects_out_of_range_and_structured() {
        assert!(to_python(&big_auto(), Value::from("99999999999999999999")).is_err());
        assert!(to_python(&big_auto(), Value::Float(f64::INFINITY)).is_err());
        assert!(to_python(&big_auto(), Value::Json(json!(1))).is_err());
        assert!(to_python(&big_auto(), Value::from("4.2")).is_err());
    }

    #[test]
    fn test_host_integer_message() {
        let f = FieldDef::new("count", FieldType::IntegerField);
        match to_python(&f, Value::from("x")).unwrap_err() {
            FieldError::ValidationError(inner) => assert_eq!(inner.message, INTEGER_MESSAGE),
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_json_null_becomes_empty_object_when_blank() {
        let f = FieldDef::new("extra", FieldType::JsonField).blank();
        assert_eq!(to_python(&f, Value::Null).unwrap(), Value::Json(json!({})));
    }

    #[test]
    fn test_json_null_kept_otherwise() {
        let nullable = FieldDef::new("extra", FieldType::JsonField).blank().nullable();
        assert_eq!(to_python(&nullable, Value::Null).unwrap(), Value::Null);

        let required = FieldDef::new("extra", FieldType::JsonField);
        assert_eq!(to_python(&required, Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_json_values_unchanged() {
        let f = FieldDef::new("extra", FieldType::JsonField).blank();
        for raw in [
            Value::Json(json!({"nested": {"k": [1, 2.5, null]}})),
            Value::Json(json!([])),
            Value::from("{\"not\": \"parsed\"}"),
            Value::Int(3),
        ] {
            assert_eq!(to_python(&f, raw.clone()).unwrap(), raw);
        }
    }

    #[test]
    fn test_relation_and_text_pass_through() {
        let fk = FieldDef::new("client", FieldType::BigForeignKey(RelationDef::new("a.b")));
        assert_eq!(to_python(&fk, Value::from("7")).unwrap(), Value::from("7"));
        let text = FieldDef::new("name", FieldType::CharField);
        assert_eq!(to_python(&text, Value::from("x")).unwrap(), Value::from("x"));
    }
}
