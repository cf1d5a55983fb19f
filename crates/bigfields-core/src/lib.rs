//! # bigfields-core
//!
//! Error types, settings and logging shared by the bigfields crates.
//!
//! ## Modules
//!
//! - [`error`] - [`FieldError`], [`ValidationError`] and the result alias
//! - [`settings`] - Database and logging settings plus the global [`SETTINGS`]
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

pub use error::{FieldError, FieldResult, ValidationError};
pub use settings::{DatabaseSettings, Settings, SETTINGS};
