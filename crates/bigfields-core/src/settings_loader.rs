//! Settings loading from configuration files and the environment.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variables
//!
//! | Env Var | Setting |
//! |---|---|
//! | `BIGFIELDS_DEBUG` | `debug` |
//! | `BIGFIELDS_LOG_LEVEL` | `log_level` |
//! | `BIGFIELDS_DB_ENGINE` | `databases.default.engine` |
//! | `BIGFIELDS_DB_NAME` | `databases.default.name` |
//! | `BIGFIELDS_RELATED_FIELDS_MATCH_TYPE` | `databases.default.related_fields_match_type` |

use std::path::Path;

use crate::error::FieldError;
use crate::settings::Settings;

/// Loads settings from a TOML string, keeping defaults for anything absent.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FieldError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FieldError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FieldError> {
    from_toml_str(&read_file(path.as_ref(), "TOML")?)
}

/// Loads settings from a JSON string, keeping defaults for anything absent.
pub fn from_json_str(json_str: &str) -> Result<Settings, FieldError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FieldError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FieldError> {
    from_json_str(&read_file(path.as_ref(), "JSON")?)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    from_vars(|key| std::env::var(key).ok())
}

/// Applies `BIGFIELDS_*` environment variable overrides.
///
/// Database overrides target the `default` alias, creating it if needed.
/// Boolean values accept "true"/"1"/"yes"; anything else is `false`.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

fn from_vars(var: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();
    apply_overrides(&mut settings, var);
    settings
}

fn apply_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("BIGFIELDS_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Some(val) = var("BIGFIELDS_LOG_LEVEL") {
        settings.log_level = val;
    }

    let engine = var("BIGFIELDS_DB_ENGINE");
    let name = var("BIGFIELDS_DB_NAME");
    let match_type = var("BIGFIELDS_RELATED_FIELDS_MATCH_TYPE");
    if engine.is_none() && name.is_none() && match_type.is_none() {
        return;
    }

    let db = settings.databases.entry("default".to_string()).or_default();
    if let Some(val) = engine {
        db.engine = val;
    }
    if let Some(val) = name {
        db.name = val;
    }
    if let Some(val) = match_type {
        db.related_fields_match_type = Some(parse_bool(&val));
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

// ============================================================
// Helpers
// ============================================================

fn read_file(path: &Path, kind: &str) -> Result<String, FieldError> {
    std::fs::read_to_string(path).map_err(|e| {
        FieldError::ConfigurationError(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, kind: &str) -> Result<Settings, FieldError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FieldError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let mut merged = merge_json(default_json, value);
    fill_database_defaults(&mut merged)?;
    serde_json::from_value(merged).map_err(|e| {
        FieldError::ConfigurationError(format!("Failed to deserialize settings from {kind}: {e}"))
    })
}

/// Aliases other than `default` have no base to merge over, so each one is
/// merged over a default `DatabaseSettings` here.
fn fill_database_defaults(merged: &mut serde_json::Value) -> Result<(), FieldError> {
    let Some(databases) = merged
        .get_mut("databases")
        .and_then(serde_json::Value::as_object_mut)
    else {
        return Ok(());
    };

    let base = serde_json::to_value(crate::settings::DatabaseSettings::default()).map_err(|e| {
        FieldError::ConfigurationError(format!("Failed to serialize default database: {e}"))
    })?;
    for entry in databases.values_mut() {
        let value = std::mem::take(entry);
        *entry = merge_json(base.clone(), value);
    }
    Ok(())
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = match base_map.remove(&key) {
                    Some(base_v) => merge_json(base_v, override_v),
                    None => override_v,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "bigfields_db=debug"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "bigfields_db=debug");
        assert_eq!(settings.databases["default"].engine, "postgresql");
    }

    #[test]
    fn test_from_toml_str_databases() {
        let toml = r#"
            [databases.default]
            engine = "django.db.backends.mysql"
            name = "oauth"
            port = 3306
            related_fields_match_type = false
        "#;

        let settings = from_toml_str(toml).unwrap();
        let db = &settings.databases["default"];
        assert_eq!(db.engine, "django.db.backends.mysql");
        assert_eq!(db.name, "oauth");
        assert_eq!(db.port, 3306);
        assert_eq!(db.related_fields_match_type, Some(false));
    }

    #[test]
    fn test_from_toml_str_extra_alias_gets_defaults() {
        let toml = r#"
            [databases.legacy]
            engine = "oracle"
        "#;

        let settings = from_toml_str(toml).unwrap();
        let legacy = &settings.databases["legacy"];
        assert_eq!(legacy.engine, "oracle");
        assert!(legacy.options.is_empty());
        assert!(legacy.related_fields_match_type.is_none());
        assert!(settings.databases.contains_key("default"));
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let err = from_toml_str("this is = = not toml").unwrap_err();
        assert!(matches!(err, FieldError::ConfigurationError(_)));
    }

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{"databases": {"default": {"engine": "oracle"}}, "extra": {"k": 1}}"#;
        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.databases["default"].engine, "oracle");
        assert_eq!(settings.extra["k"], serde_json::json!(1));
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = from_toml_file("/nonexistent/bigfields.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read TOML file"));
        assert!(from_json_file("/nonexistent/bigfields.json").is_err());
    }

    #[test]
    fn test_overrides_from_map() {
        let vars: HashMap<&str, &str> = [
            ("BIGFIELDS_DEBUG", "0"),
            ("BIGFIELDS_LOG_LEVEL", "warn"),
            ("BIGFIELDS_DB_ENGINE", "mysql"),
            ("BIGFIELDS_RELATED_FIELDS_MATCH_TYPE", "yes"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        apply_overrides(&mut settings, |k| vars.get(k).map(ToString::to_string));
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "warn");
        let db = &settings.databases["default"];
        assert_eq!(db.engine, "mysql");
        assert_eq!(db.related_fields_match_type, Some(true));
    }

    #[test]
    fn test_overrides_create_default_alias() {
        let mut settings = Settings::default();
        settings.databases.clear();
        apply_overrides(&mut settings, |k| {
            (k == "BIGFIELDS_DB_NAME").then(|| "tokens".to_string())
        });
        assert_eq!(settings.databases["default"].name, "tokens");
        assert_eq!(settings.databases["default"].engine, "postgresql");
    }

    #[test]
    fn test_from_vars_starts_from_defaults() {
        let settings = from_vars(|k| match k {
            "BIGFIELDS_DB_ENGINE" => Some("django.db.backends.oracle".to_string()),
            "BIGFIELDS_RELATED_FIELDS_MATCH_TYPE" => Some("false".to_string()),
            _ => None,
        });
        assert!(settings.debug);
        assert_eq!(settings.log_level, "info");
        let db = &settings.databases["default"];
        assert_eq!(db.engine, "django.db.backends.oracle");
        assert_eq!(db.related_fields_match_type, Some(false));
    }

    #[test]
    fn test_from_vars_without_variables_is_default() {
        let settings = from_vars(|_| None);
        assert_eq!(settings.databases.len(), 1);
        assert_eq!(settings.databases["default"], crate::settings::DatabaseSettings::default());
    }

    #[test]
    fn test_no_db_overrides_leaves_databases_alone() {
        let mut settings = Settings::default();
        settings.databases.clear();
        apply_overrides(&mut settings, |_| None);
        assert!(settings.databases.is_empty());
    }
}
