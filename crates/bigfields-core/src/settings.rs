//! Settings for bigfields.
//!
//! [`Settings`] holds the database configuration the column type resolver
//! consults, plus logging options. [`LazySettings`] is a write-once global
//! container, configured at startup and read during schema generation.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Database connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// The engine name, bare (`postgresql`) or as a dotted backend path
    /// (`django.db.backends.mysql`).
    pub engine: String,
    /// The database name.
    pub name: String,
    /// The database user.
    pub user: String,
    /// The database password.
    pub password: String,
    /// The database host.
    pub host: String,
    /// The database port.
    pub port: u16,
    /// Additional engine-specific options.
    pub options: HashMap<String, String>,
    /// Overrides the engine's default for whether a relation column must
    /// share the exact type of the column it references.
    pub related_fields_match_type: Option<bool>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            engine: "postgresql".to_string(),
            name: String::new(),
            user: String::new(),
            password: String::new(),
            host: String::new(),
            port: 0,
            options: HashMap::new(),
            related_fields_match_type: None,
        }
    }
}

/// The complete set of settings.
///
/// # Examples
///
/// ```
/// use bigfields_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.databases["default"].engine, "postgresql");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled. Selects the pretty log format.
    pub debug: bool,
    /// The log filter directive (e.g. "info", "bigfields_db=debug").
    pub log_level: String,
    /// Database configurations, keyed by alias (e.g. "default").
    pub databases: HashMap<String, DatabaseSettings>,
    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut databases = HashMap::new();
        databases.insert("default".to_string(), DatabaseSettings::default());

        Self {
            debug: true,
            log_level: "info".to_string(),
            databases,
            extra: HashMap::new(),
        }
    }
}

impl Settings {
    /// Returns the database configuration registered under `alias`.
    pub fn database(&self, alias: &str) -> Option<&DatabaseSettings> {
        self.databases.get(alias)
    }
}

/// A lazily-initialized, globally-accessible settings container.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the settings. Returns the rejected value if settings were
    /// already configured.
    pub fn configure(&self, settings: Settings) -> Result<(), Settings> {
        self.inner.set(settings)
    }

    /// Returns the configured settings, if any.
    pub fn get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert!(s.extra.is_empty());
    }

    #[test]
    fn test_default_database() {
        let s = Settings::default();
        let db = s.database("default").expect("default db should exist");
        assert_eq!(db.engine, "postgresql");
        assert!(db.related_fields_match_type.is_none());
        assert!(s.database("replica").is_none());
    }

    #[test]
    fn test_lazy_settings_configure_and_get() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());
        assert!(lazy.get().is_none());

        let mut settings = Settings::default();
        settings.debug = false;
        assert!(lazy.configure(settings).is_ok());
        assert!(lazy.is_configured());
        assert!(!lazy.get().unwrap().debug);
    }

    #[test]
    fn test_lazy_settings_configure_twice_rejected() {
        let lazy = LazySettings::new();
        assert!(lazy.configure(Settings::default()).is_ok());

        let mut second = Settings::default();
        second.log_level = "debug".to_string();
        let rejected = lazy.configure(second).unwrap_err();
        assert_eq!(rejected.log_level, "debug");
        assert_eq!(lazy.get().unwrap().log_level, "info");
    }

    #[test]
    fn test_settings_serde_roundtrip_keeps_override() {
        let mut s = Settings::default();
        s.databases.get_mut("default").unwrap().related_fields_match_type = Some(true);
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.databases["default"].related_fields_match_type, Some(true));
    }
}
