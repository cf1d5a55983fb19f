//! Field declarations and their hooks.
//!
//! [`FieldDef`] and [`FieldType`] describe declared columns. Each category
//! exposes two hooks: the column type ([`resolver::db_type`]) and the
//! read-time coercion ([`coercion::to_python`]).

pub mod coercion;
pub mod json;
pub mod resolver;
pub mod types;

pub use types::{FieldDef, FieldType, OnDelete, RelationDef};

use bigfields_core::FieldResult;

use crate::connection::Connection;
use crate::value::Value;

impl FieldDef {
    /// Resolves this field's column type. Relations need `related`.
    pub fn db_type(&self, connection: &Connection, related: Option<&Self>) -> FieldResult<String> {
        resolver::db_type(self, related, connection)
    }

    /// Converts a raw stored value to this field's logical value.
    pub fn to_python(&self, value: Value) -> FieldResult<Value> {
        coercion::to_python(self, value)
    }
}
