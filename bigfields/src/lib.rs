//! # bigfields
//!
//! 64-bit identifier, relation and JSON field types with engine-aware
//! column type resolution.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `bigfields-core` or `bigfields-db` directly for finer-grained control.

/// Error types, settings and logging.
pub use bigfields_core as core;

/// Field declarations, the column type resolver and the field registry.
pub use bigfields_db as db;

/// The types most schema code needs.
pub mod prelude {
    pub use bigfields_core::{FieldError, FieldResult, Settings, ValidationError};
    pub use bigfields_db::{
        Connection, Engine, FieldDef, FieldRegistry, FieldType, ModelSchema, OnDelete,
        RelationDef, Value,
    };
}

pub use serde_json;
pub use tracing;
