//! Connection descriptors.
//!
//! A [`Connection`] is what the column type resolver knows about a database:
//! which engine it is and whether relation columns must match the exact type
//! of the column they reference. It is built from
//! [`DatabaseSettings`](bigfields_core::settings::DatabaseSettings) and never
//! talks to a live database.

use std::fmt;

use bigfields_core::settings::{DatabaseSettings, LazySettings, Settings, SETTINGS};
use bigfields_core::{FieldError, FieldResult};

/// The database engines the resolver distinguishes.
///
/// The set is closed: anything that is not MySQL, Oracle or a Postgres-family
/// engine is `Other` and the engine-specific lookups reject it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Engine {
    /// MySQL / MariaDB.
    MySql,
    /// Oracle.
    Oracle,
    /// PostgreSQL and derivatives (`postgresql_psycopg2`, `postgis`, ...).
    Postgres,
    /// Any other engine, keeping the configured name.
    Other(String),
}

impl Engine {
    /// Identifies an engine from a configured name.
    ///
    /// Dotted backend paths are reduced to their last segment, so
    /// `django.db.backends.postgresql` and `postgresql` are the same engine.
    ///
    /// # Examples
    ///
    /// ```
    /// use bigfields_db::connection::Engine;
    ///
    /// assert_eq!(Engine::from_name("mysql"), Engine::MySql);
    /// assert_eq!(Engine::from_name("django.db.backends.postgresql_psycopg2"), Engine::Postgres);
    /// assert_eq!(Engine::from_name("sqlite3"), Engine::Other("sqlite3".into()));
    /// ```
    pub fn from_name(name: &str) -> Self {
        let vendor = name
            .rsplit('.')
            .next()
            .unwrap_or(name)
            .trim()
            .to_ascii_lowercase();
        match vendor.as_str() {
            "mysql" => Self::MySql,
            "oracle" => Self::Oracle,
            v if v.starts_with("postgres") || v == "postgis" => Self::Postgres,
            _ => Self::Other(name.to_string()),
        }
    }

    /// Returns the vendor name used in log output and error messages.
    pub fn vendor(&self) -> &str {
        match self {
            Self::MySql => "mysql",
            Self::Oracle => "oracle",
            Self::Postgres => "postgresql",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.vendor())
    }
}

/// Engine feature flags consulted during column type resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseFeatures {
    /// Whether a referencing column must share the exact declared type of the
    /// column it references.
    pub related_fields_match_type: bool,
}

impl DatabaseFeatures {
    /// Returns the default feature set for an engine. Only MySQL requires
    /// related columns to match type.
    pub const fn for_engine(engine: &Engine) -> Self {
        Self {
            related_fields_match_type: matches!(engine, Engine::MySql),
        }
    }
}

/// Everything the resolver needs to know about a database connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// The settings alias this connection was built from.
    pub alias: String,
    /// The engine identity.
    pub engine: Engine,
    /// The engine's feature flags.
    pub features: DatabaseFeatures,
}

impl Connection {
    /// Creates a `default` connection for an engine with its default features.
    pub fn new(engine: Engine) -> Self {
        let features = DatabaseFeatures::for_engine(&engine);
        Self {
            alias: "default".to_string(),
            engine,
            features,
        }
    }

    /// Overrides the `related_fields_match_type` feature flag.
    #[must_use]
    pub const fn with_related_fields_match_type(mut self, value: bool) -> Self {
        self.features.related_fields_match_type = value;
        self
    }

    /// Builds a connection from one database's settings.
    pub fn from_settings(alias: impl Into<String>, db: &DatabaseSettings) -> Self {
        let mut conn = Self::new(Engine::from_name(&db.engine));
        conn.alias = alias.into();
        if let Some(value) = db.related_fields_match_type {
            conn.features.related_fields_match_type = value;
        }
        tracing::debug!(
            alias = %conn.alias,
            engine = %conn.engine,
            related_fields_match_type = conn.features.related_fields_match_type,
            "built connection descriptor"
        );
        conn
    }

    /// Builds the connection for `alias` from a settings value.
    pub fn from_config(settings: &Settings, alias: &str) -> FieldResult<Self> {
        settings
            .database(alias)
            .map(|db| Self::from_settings(alias, db))
            .ok_or_else(|| {
                FieldError::ImproperlyConfigured(format!(
                    "The database alias '{alias}' is not configured."
                ))
            })
    }

    /// Builds the connection for `alias` from the global [`SETTINGS`].
    pub fn for_alias(alias: &str) -> FieldResult<Self> {
        Self::from_lazy(&SETTINGS, alias)
    }

    fn from_lazy(lazy: &LazySettings, alias: &str) -> FieldResult<Self> {
        let settings = lazy.get().ok_or_else(|| {
            FieldError::ImproperlyConfigured(
                "Settings have not been configured. Call SETTINGS.configure() first.".to_string(),
            )
        })?;
        Self::from_config(settings, alias)
    }

    /// Returns the engine's vendor name.
    pub fn vendor(&self) -> &str {
        self.engine.vendor()
    }
}
