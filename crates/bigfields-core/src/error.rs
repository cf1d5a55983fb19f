//! Error types for bigfields.
//!
//! Two failure kinds come out of column type resolution and value coercion:
//! [`FieldError::UnsupportedEngine`] at schema-generation time and
//! [`FieldError::ValidationError`] when a stored value cannot be read back.
//! The remaining variants cover registry wiring and settings loading.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A single validation failure raised while coercing a stored value.
///
/// # Examples
///
/// ```
/// use bigfields_core::error::ValidationError;
///
/// let err = ValidationError::new("This value must be a long integer.", "invalid")
///     .with_param("value", "abc");
/// assert_eq!(err.code, "invalid");
/// assert_eq!(err.to_string(), "This value must be a long integer.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The human-readable message.
    pub message: String,
    /// A short code identifying the failure (e.g. "invalid").
    pub code: String,
    /// Extra context, such as the offending raw value.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The error type shared by every bigfields crate.
#[derive(Error, Debug)]
pub enum FieldError {
    // ── Resolution ───────────────────────────────────────────────────

    /// The connection's engine has no mapping for the requested column type.
    #[error("Unsupported database engine: {0}")]
    UnsupportedEngine(String),

    // ── Coercion ─────────────────────────────────────────────────────

    /// A stored value could not be converted to the field's logical type.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    // ── Wiring ───────────────────────────────────────────────────────

    /// A field or model reference cannot be resolved.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A settings file is missing or malformed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A value could not be encoded for storage.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl FieldError {
    /// Builds the `InvalidValue` failure for a raw value that could not be
    /// coerced. The rejected value is kept as the `value` param.
    pub fn invalid_value(message: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ValidationError(ValidationError::new(message, "invalid").with_param("value", value))
    }

    /// Returns `true` for read-time value failures.
    pub const fn is_invalid_value(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Returns `true` for schema-generation engine failures.
    pub const fn is_unsupported_engine(&self) -> bool {
        matches!(self, Self::UnsupportedEngine(_))
    }
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

/// A convenience type alias for `Result<T, FieldError>`.
pub type FieldResult<T> = Result<T, FieldError>;
