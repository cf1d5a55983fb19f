//! Column type resolution.
//!
//! Maps a field declaration and a [`Connection`] to the physical column type
//! handed to DDL generation.
//!
//! The 64-bit relations do not simply copy the type of the column they
//! reference. When the target is a 64-bit identifier, or a plain
//! `BigIntegerField` on an engine that does not require matching types, the
//! relation column gets the engine's native bigint type. A referencing column
//! must never inherit `AUTO_INCREMENT`, `bigserial` or
//! `DEFAULT id_generator()` from the column it points at.

use bigfields_core::{FieldError, FieldResult};

use crate::connection::{Connection, Engine};
use crate::fields::json;
use crate::fields::types::{FieldDef, FieldType};

/// The column default that fills [`FieldType::BigUuidField`] columns. The
/// `id_generator()` function must exist in the database schema.
pub const GENERATED_IDENTIFIER_TYPE: &str = "bigint DEFAULT id_generator()";

/// Length used for `CharField` columns declared without `max_length`.
pub const DEFAULT_MAX_LENGTH: usize = 255;

fn unsupported(engine: &Engine, what: &str) -> FieldError {
    tracing::warn!(engine = %engine, column = what, "no column type for engine");
    FieldError::UnsupportedEngine(format!("{engine} has no {what} column type"))
}

/// Returns the column type of a [`FieldType::BigAutoField`].
///
/// # Examples
///
/// ```
/// use bigfields_db::connection::{Connection, Engine};
/// use bigfields_db::fields::resolver::identifier_type;
///
/// let conn = Connection::new(Engine::MySql);
/// assert_eq!(identifier_type(&conn).unwrap(), "bigint AUTO_INCREMENT");
/// assert!(identifier_type(&Connection::new(Engine::Other("sqlite3".into()))).is_err());
/// ```
pub fn identifier_type(connection: &Connection) -> FieldResult<String> {
    match &connection.engine {
        Engine::MySql => Ok("bigint AUTO_INCREMENT".to_string()),
        Engine::Oracle => Ok("NUMBER(19)".to_string()),
        Engine::Postgres => Ok("bigserial".to_string()),
        engine @ Engine::Other(_) => Err(unsupported(engine, "BigAutoField")),
    }
}

/// Returns the column type of a [`FieldType::BigUuidField`]. The engine is
/// not consulted.
pub fn generated_identifier_type() -> String {
    GENERATED_IDENTIFIER_TYPE.to_string()
}

/// Returns the engine's plain 64-bit integer column type.
pub fn native_bigint_type(connection: &Connection) -> FieldResult<String> {
    match &connection.engine {
        Engine::MySql | Engine::Postgres => Ok("bigint".to_string()),
        Engine::Oracle => Ok("NUMBER(19)".to_string()),
        engine @ Engine::Other(_) => Err(unsupported(engine, "BigIntegerField")),
    }
}

/// Returns the engine's plain 32-bit integer column type.
pub fn native_integer_type(connection: &Connection) -> FieldResult<String> {
    match &connection.engine {
        Engine::MySql | Engine::Postgres => Ok("integer".to_string()),
        Engine::Oracle => Ok("NUMBER(11)".to_string()),
        engine @ Engine::Other(_) => Err(unsupported(engine, "IntegerField")),
    }
}

/// Resolves the column type of a relation field.
///
/// `target` is the declaration of the referenced field. When the target is
/// itself a relation it is resolved with [`db_type`] and no related field,
/// which fails; use
/// [`FieldRegistry`](crate::registry::FieldRegistry) to follow relation
/// chains.
pub fn relation_type(
    local: &FieldDef,
    target: &FieldDef,
    connection: &Connection,
) -> FieldResult<String> {
    relation_type_with(local, target, connection, |t| db_type(t, None, connection))
}

/// Resolves the column type of a relation field, using `delegate` when the
/// relation takes on the target's own column type.
///
/// Rules for the 64-bit relations, first match wins:
///
/// 1. target is a `BigAutoField` or `BigUuidField`: native bigint;
/// 2. the engine does not require matching types and the target is a
///    `BigIntegerField`: native bigint;
/// 3. otherwise the target's own column type.
///
/// Host relations (`ForeignKey`, `OneToOneField`) use the native 32-bit
/// integer type for any auto-generated target, and the target's type
/// otherwise.
pub fn relation_type_with<F>(
    local: &FieldDef,
    target: &FieldDef,
    connection: &Connection,
    delegate: F,
) -> FieldResult<String>
where
    F: FnOnce(&FieldDef) -> FieldResult<String>,
{
    let target_type = &target.field_type;

    match &local.field_type {
        FieldType::BigForeignKey(_) | FieldType::BigOneToOneField(_) => {
            if target_type.is_big_identifier() {
                tracing::debug!(
                    field = local.name,
                    target = target.name,
                    engine = %connection.engine,
                    rule = 1,
                    "relation to a 64-bit identifier uses native bigint"
                );
                return native_bigint_type(connection);
            }
            if !connection.features.related_fields_match_type
                && matches!(target_type, FieldType::BigIntegerField)
            {
                tracing::debug!(
                    field = local.name,
                    target = target.name,
                    engine = %connection.engine,
                    rule = 2,
                    "relation to a bigint column uses native bigint"
                );
                return native_bigint_type(connection);
            }
            tracing::debug!(
                field = local.name,
                target = target.name,
                rule = 3,
                "relation takes the target's column type"
            );
            delegate(target)
        }
        FieldType::ForeignKey(_) | FieldType::OneToOneField(_) => {
            if target_type.is_auto() {
                native_integer_type(connection)
            } else {
                delegate(target)
            }
        }
        other => Err(FieldError::ImproperlyConfigured(format!(
            "Field '{}' is a {}, not a relation.",
            local.name,
            other.internal_type()
        ))),
    }
}

/// Resolves the column type of any field.
///
/// Relation fields need the declaration of the field they reference in
/// `related`; for every other category `related` is ignored.
pub fn db_type(
    field: &FieldDef,
    related: Option<&FieldDef>,
    connection: &Connection,
) -> FieldResult<String> {
    let engine = &connection.engine;
    let max_length = field.max_length.unwrap_or(DEFAULT_MAX_LENGTH);
    let resolved = match (&field.field_type, engine) {
        (
            FieldType::BigForeignKey(_)
            | FieldType::BigOneToOneField(_)
            | FieldType::ForeignKey(_)
            | FieldType::OneToOneField(_),
            _,
        ) => {
            let target = related.ok_or_else(|| {
                FieldError::ImproperlyConfigured(format!(
                    "Relation field '{}' cannot be resolved without its related field.",
                    field.name
                ))
            })?;
            return relation_type(field, target, connection);
        }
        (FieldType::BigAutoField, _) => return identifier_type(connection),
        (FieldType::BigUuidField, _) => return Ok(generated_identifier_type()),
        (FieldType::JsonField, _) => return json::db_type(connection),
        (FieldType::BigIntegerField, _) => return native_bigint_type(connection),
        (FieldType::IntegerField, _) => return native_integer_type(connection),
        (_, Engine::Other(_)) => return Err(unsupported(engine, field.internal_type())),

        (FieldType::AutoField, Engine::Postgres) => "serial".to_string(),
        (FieldType::AutoField, Engine::MySql) => "integer AUTO_INCREMENT".to_string(),
        (FieldType::AutoField, Engine::Oracle) => "NUMBER(11)".to_string(),

        (FieldType::SmallIntegerField, Engine::Postgres | Engine::MySql) => {
            "smallint".to_string()
        }
        (FieldType::SmallIntegerField, Engine::Oracle) => "NUMBER(11)".to_string(),

        (FieldType::CharField, Engine::Postgres | Engine::MySql) => {
            format!("varchar({max_length})")
        }
        (FieldType::CharField, Engine::Oracle) => format!("NVARCHAR2({max_length})"),

        (FieldType::TextField, Engine::Postgres) => "text".to_string(),
        (FieldType::TextField, Engine::MySql) => "longtext".to_string(),
        (FieldType::TextField, Engine::Oracle) => "NCLOB".to_string(),

        (FieldType::BooleanField, Engine::Postgres) => "boolean".to_string(),
        (FieldType::BooleanField, Engine::MySql) => "bool".to_string(),
        (FieldType::BooleanField, Engine::Oracle) => "NUMBER(1)".to_string(),

        (FieldType::DateTimeField, Engine::Postgres) => "timestamp with time zone".to_string(),
        (FieldType::DateTimeField, Engine::MySql) => "datetime".to_string(),
        (FieldType::DateTimeField, Engine::Oracle) => "TIMESTAMP".to_string(),

        (FieldType::UuidField, Engine::Postgres) => "uuid".to_string(),
        (FieldType::UuidField, Engine::MySql) => "char(32)".to_string(),
        (FieldType::UuidField, Engine::Oracle) => "VARCHAR2(32)".to_string(),
    };
    Ok(resolved)
}
