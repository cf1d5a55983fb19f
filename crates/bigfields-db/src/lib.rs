//! # bigfields-db
//!
//! Field declarations and column type resolution for 64-bit identifiers,
//! 64-bit relations and JSON columns.
//!
//! ## Module Overview
//!
//! - [`connection`] - [`Connection`] descriptors and the closed [`Engine`] set
//! - [`fields`] - [`FieldDef`], [`FieldType`], the column type resolver and
//!   the read-time coercion hooks
//! - [`registry`] - [`FieldRegistry`], which follows relations to the fields
//!   they reference
//! - [`value`] - the backend-agnostic [`Value`] enum
//!
//! ## Example
//!
//! ```
//! use bigfields_db::{Connection, Engine, FieldDef, FieldRegistry, FieldType, ModelSchema, RelationDef};
//!
//! let mut registry = FieldRegistry::new();
//! registry.register(
//!     ModelSchema::new("oauth2", "client")
//!         .field(FieldDef::new("id", FieldType::BigAutoField).primary_key()),
//! ).unwrap();
//! registry.register(
//!     ModelSchema::new("oauth2", "token")
//!         .field(FieldDef::new("id", FieldType::BigUuidField).primary_key())
//!         .field(FieldDef::new("client", FieldType::BigForeignKey(RelationDef::new("oauth2.client")))),
//! ).unwrap();
//!
//! let conn = Connection::new(Engine::Postgres);
//! let columns = registry.column_types("oauth2.token", &conn).unwrap();
//! assert_eq!(columns[0].1, "bigint DEFAULT id_generator()");
//! assert_eq!(columns[1], ("client_id".to_string(), "bigint".to_string()));
//! ```

// - struct_excessive_bools: FieldDef carries the usual column flags
// - doc_markdown: field category names are not code items
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::doc_markdown)]

pub mod connection;
pub mod fields;
pub mod registry;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use connection::{Connection, DatabaseFeatures, Engine};
pub use fields::resolver::{
    db_type, generated_identifier_type, identifier_type, native_bigint_type, relation_type,
};
pub use fields::{FieldDef, FieldType, OnDelete, RelationDef};
pub use registry::{FieldRegistry, ModelSchema};
pub use value::Value;
