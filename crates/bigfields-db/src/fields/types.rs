//! Field type definitions.
//!
//! Each [`FieldType`] variant is a field category; [`FieldDef`] captures one
//! declared column. The 64-bit categories (`BigAutoField`, `BigUuidField`,
//! `BigForeignKey`, `BigOneToOneField`) and `JsonField` are provided by this
//! crate; the remaining variants are the ordinary host categories that
//! relations may point at.

use crate::value::Value;

/// The category of a model field, determining its column type and read hook.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum FieldType {
    // ── Provided by bigfields ───────────────────────────────────────────
    /// Auto-incrementing 64-bit integer identifier.
    BigAutoField,
    /// 64-bit identifier filled by the database-side `id_generator()`.
    BigUuidField,
    /// Many-to-one relation stored as a 64-bit integer.
    BigForeignKey(RelationDef),
    /// One-to-one relation stored as a 64-bit integer.
    BigOneToOneField(RelationDef),
    /// Structured JSON data.
    JsonField,

    // ── Host categories ────────────────────────────────────────────────
    /// Auto-incrementing 32-bit integer primary key.
    AutoField,
    /// 64-bit signed integer.
    BigIntegerField,
    /// 32-bit signed integer.
    IntegerField,
    /// 16-bit signed integer.
    SmallIntegerField,
    /// Variable-length string with a max length.
    CharField,
    /// Unlimited-length text.
    TextField,
    /// Boolean (true/false).
    BooleanField,
    /// Date and time.
    DateTimeField,
    /// UUID field.
    UuidField,
    /// Many-to-one relation typed after its target.
    ForeignKey(RelationDef),
    /// One-to-one relation typed after its target.
    OneToOneField(RelationDef),
}

/// The target side of a relation field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RelationDef {
    /// The target model label (e.g. "oauth2.client"), or "self".
    pub to: String,
    /// The referenced field name. `None` means the target's primary key.
    pub to_field: Option<String>,
    /// Behavior when the referenced object is deleted.
    pub on_delete: OnDelete,
    /// The name used for the reverse relation.
    pub related_name: Option<String>,
}

impl RelationDef {
    /// Creates a relation to the primary key of `to`, cascading on delete.
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            to_field: None,
            on_delete: OnDelete::Cascade,
            related_name: None,
        }
    }

    /// Points the relation at a named field instead of the primary key.
    #[must_use]
    pub fn to_field(mut self, field: impl Into<String>) -> Self {
        self.to_field = Some(field.into());
        self
    }

    /// Sets the ON DELETE behavior.
    #[must_use]
    pub const fn on_delete(mut self, on_delete: OnDelete) -> Self {
        self.on_delete = on_delete;
        self
    }

    /// Sets the reverse relation name.
    #[must_use]
    pub fn related_name(mut self, name: impl Into<String>) -> Self {
        self.related_name = Some(name.into());
        self
    }
}

/// Behavior when a referenced object is deleted (ON DELETE action).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OnDelete {
    /// Delete all related objects (CASCADE).
    Cascade,
    /// Prevent deletion if related objects exist (PROTECT).
    Protect,
    /// Set the foreign key to NULL.
    SetNull,
    /// Set the foreign key to its default value.
    SetDefault,
    /// Take no action (may cause integrity errors).
    DoNothing,
}

impl FieldType {
    /// Returns the name the category is registered under.
    pub const fn internal_type(&self) -> &'static str {
        match self {
            Self::BigAutoField => "BigAutoField",
            Self::BigUuidField => "BigUUIDField",
            Self::BigForeignKey(_) => "BigForeignKey",
            Self::BigOneToOneField(_) => "BigOneToOneField",
            Self::JsonField => "JSONField",
            Self::AutoField => "AutoField",
            Self::BigIntegerField => "BigIntegerField",
            Self::IntegerField => "IntegerField",
            Self::SmallIntegerField => "SmallIntegerField",
            Self::CharField => "CharField",
            Self::TextField => "TextField",
            Self::BooleanField => "BooleanField",
            Self::DateTimeField => "DateTimeField",
            Self::UuidField => "UUIDField",
            Self::ForeignKey(_) => "ForeignKey",
            Self::OneToOneField(_) => "OneToOneField",
        }
    }

    /// Returns the relation target for relation categories.
    pub const fn relation(&self) -> Option<&RelationDef> {
        match self {
            Self::BigForeignKey(rel)
            | Self::BigOneToOneField(rel)
            | Self::ForeignKey(rel)
            | Self::OneToOneField(rel) => Some(rel),
            _ => None,
        }
    }

    /// Returns `true` for the 64-bit relation categories.
    pub const fn is_big_relation(&self) -> bool {
        matches!(self, Self::BigForeignKey(_) | Self::BigOneToOneField(_))
    }

    /// Returns `true` for the 64-bit identifier categories.
    pub const fn is_big_identifier(&self) -> bool {
        matches!(self, Self::BigAutoField | Self::BigUuidField)
    }

    /// Returns `true` for every category whose value the database generates.
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::AutoField | Self::BigAutoField | Self::BigUuidField)
    }
}

/// Complete definition of a model field.
///
/// Declarations are built once, while the schema is defined, and are not
/// mutated afterwards.
///
/// # Examples
///
/// ```
/// use bigfields_db::fields::{FieldDef, FieldType, RelationDef};
///
/// let id = FieldDef::new("id", FieldType::BigAutoField).primary_key();
/// assert!(id.primary_key);
///
/// let client = FieldDef::new("client", FieldType::BigForeignKey(RelationDef::new("oauth2.client")));
/// assert_eq!(client.column, "client_id");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// The attribute name of this field.
    pub name: &'static str,
    /// The database column name.
    pub column: String,
    /// The category of this field.
    pub field_type: FieldType,
    /// Whether this field is the primary key.
    pub primary_key: bool,
    /// Whether NULL is allowed in the database.
    pub null: bool,
    /// Whether the field may be left blank.
    pub blank: bool,
    /// Default value for new instances.
    pub default: Option<Value>,
    /// Whether a UNIQUE constraint is applied.
    pub unique: bool,
    /// Whether a database index should be created.
    pub db_index: bool,
    /// Maximum character length (for CharField).
    pub max_length: Option<usize>,
    /// Human-readable help text.
    pub help_text: String,
    /// Human-readable name for the field.
    pub verbose_name: String,
}

impl FieldDef {
    /// Creates a new `FieldDef` with defaults.
    ///
    /// Relation columns are named `<name>_id`; one-to-one relations are
    /// unique.
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        let column = if field_type.relation().is_some() {
            format!("{name}_id")
        } else {
            name.to_string()
        };
        let unique = matches!(
            field_type,
            FieldType::BigOneToOneField(_) | FieldType::OneToOneField(_)
        );
        Self {
            name,
            column,
            field_type,
            primary_key: false,
            null: false,
            blank: false,
            default: None,
            unique,
            db_index: false,
            max_length: None,
            help_text: String::new(),
            verbose_name: name.replace('_', " "),
        }
    }

    /// Sets the database column name.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Marks this field as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Allows NULL values in the database.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Allows the field to be left blank.
    #[must_use]
    pub const fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    /// Sets the maximum character length.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Marks this field as having a database index.
    #[must_use]
    pub const fn db_index(mut self) -> Self {
        self.db_index = true;
        self
    }

    /// Marks this field as having a UNIQUE constraint.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default value for this field.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the verbose (human-readable) name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Returns `true` if this field represents a relation.
    pub const fn is_relation(&self) -> bool {
        self.field_type.relation().is_some()
    }

    /// Returns the registrable name of this field's category.
    pub const fn internal_type(&self) -> &'static str {
        self.field_type.internal_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_def_new_defaults() {
        let f = FieldDef::new("access_token", FieldType::CharField);
        assert_eq!(f.name, "access_token");
        assert_eq!(f.column, "access_token");
        assert!(!f.primary_key);
        assert!(!f.null);
        assert!(!f.blank);
        assert!(f.default.is_none());
        assert!(!f.unique);
        assert!(!f.db_index);
        assert!(f.max_length.is_none());
        assert_eq!(f.verbose_name, "access token");
    }

    #[test]
    fn test_field_def_builder() {
        let f = FieldDef::new("scope", FieldType::JsonField)
            .column("scopes")
            .blank()
            .db_index()
            .help_text("Granted scopes");
        assert_eq!(f.column, "scopes");
        assert!(f.blank);
        assert!(f.db_index);
        assert_eq!(f.help_text, "Granted scopes");
    }

    #[test]
    fn test_relation_column_and_uniqueness() {
        let fk = FieldDef::new("user", FieldType::BigForeignKey(RelationDef::new("auth.user")));
        assert_eq!(fk.column, "user_id");
        assert!(!fk.unique);
        assert!(fk.is_relation());

        let o2o = FieldDef::new(
            "grant",
            FieldType::BigOneToOneField(RelationDef::new("oauth2.grant")),
        );
        assert_eq!(o2o.column, "grant_id");
        assert!(o2o.unique);
    }

    #[test]
    fn test_relation_def_builder() {
        let rel = RelationDef::new("oauth2.client")
            .to_field("client_id")
            .on_delete(OnDelete::Protect)
            .related_name("tokens");
        assert_eq!(rel.to_field.as_deref(), Some("client_id"));
        assert_eq!(rel.on_delete, OnDelete::Protect);
        assert_eq!(rel.related_name.as_deref(), Some("tokens"));
    }

    #[test]
    fn test_internal_types() {
        assert_eq!(FieldType::BigAutoField.internal_type(), "BigAutoField");
        assert_eq!(FieldType::BigUuidField.internal_type(), "BigUUIDField");
        assert_eq!(FieldType::JsonField.internal_type(), "JSONField");
        let rel = RelationDef::new("a.b");
        assert_eq!(FieldType::BigForeignKey(rel.clone()).internal_type(), "BigForeignKey");
        assert_eq!(FieldType::BigOneToOneField(rel).internal_type(), "BigOneToOneField");
    }

    #[test]
    fn test_category_predicates() {
        assert!(FieldType::BigAutoField.is_big_identifier());
        assert!(FieldType::BigUuidField.is_big_identifier());
        assert!(!FieldType::AutoField.is_big_identifier());
        assert!(FieldType::AutoField.is_auto());
        assert!(!FieldType::BigIntegerField.is_auto());
        assert!(FieldType::BigForeignKey(RelationDef::new("a.b")).is_big_relation());
        assert!(!FieldType::ForeignKey(RelationDef::new("a.b")).is_big_relation());
        assert!(FieldType::JsonField.relation().is_none());
    }

    #[test]
    fn test_field_type_serde_tag() {
        let ft = FieldType::BigForeignKey(RelationDef::new("oauth2.client"));
        let json = serde_json::to_value(&ft).unwrap();
        assert_eq!(json["type"], "BigForeignKey");
        assert_eq!(json["to"], "oauth2.client");
        let back: FieldType = serde_json::from_value(json).unwrap();
        assert_eq!(back, ft);
    }
}
