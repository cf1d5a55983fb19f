//! The field registry.
//!
//! [`FieldRegistry`] holds the declared models and answers the questions
//! schema generation asks: which field does this relation point at, and what
//! column type does each field resolve to on a given connection. Relation
//! chains are followed one hop at a time so every hop applies its own rules.

use std::collections::HashMap;

use bigfields_core::logging::schema_span;
use bigfields_core::{FieldError, FieldResult};

use crate::connection::Connection;
use crate::fields::{coercion, resolver, FieldDef};
use crate::value::Value;

/// The declared fields of one model.
///
/// # Examples
///
/// ```
/// use bigfields_db::fields::{FieldDef, FieldType};
/// use bigfields_db::registry::ModelSchema;
///
/// let client = ModelSchema::new("oauth2", "Client")
///     .field(FieldDef::new("id", FieldType::BigAutoField).primary_key())
///     .field(FieldDef::new("name", FieldType::CharField).max_length(255));
/// assert_eq!(client.label(), "oauth2.client");
/// assert_eq!(client.pk().map(|f| f.name), Some("id"));
/// ```
#[derive(Debug, Clone)]
pub struct ModelSchema {
    /// The application label (e.g. "oauth2").
    pub app_label: &'static str,
    /// The model name (e.g. "client").
    pub model_name: &'static str,
    /// Field declarations in declaration order.
    pub fields: Vec<FieldDef>,
}

impl ModelSchema {
    /// Creates a model with no fields.
    pub const fn new(app_label: &'static str, model_name: &'static str) -> Self {
        Self {
            app_label,
            model_name,
            fields: Vec::new(),
        }
    }

    /// Appends a field declaration.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the lowercase `app_label.model_name` label.
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name).to_ascii_lowercase()
    }

    /// Looks up a field by attribute name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the primary key field.
    pub fn pk(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.primary_key)
    }
}

/// The registry of declared models.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    models: Vec<ModelSchema>,
    labels: HashMap<String, usize>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model. Labels are unique.
    pub fn register(&mut self, model: ModelSchema) -> FieldResult<()> {
        let label = model.label();
        if self.labels.contains_key(&label) {
            return Err(FieldError::ImproperlyConfigured(format!(
                "Model '{label}' is already registered."
            )));
        }
        tracing::debug!(model = %label, fields = model.fields.len(), "registered model");
        self.labels.insert(label, self.models.len());
        self.models.push(model);
        Ok(())
    }

    /// Returns the model registered under `label`, case-insensitively.
    pub fn get_model(&self, label: &str) -> Option<&ModelSchema> {
        self.labels
            .get(&label.to_ascii_lowercase())
            .map(|&idx| &self.models[idx])
    }

    /// Returns all registered models in registration order.
    pub fn models(&self) -> &[ModelSchema] {
        &self.models
    }

    /// Returns the number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if no model is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn model(&self, label: &str) -> FieldResult<&ModelSchema> {
        self.get_model(label).ok_or_else(|| {
            FieldError::ImproperlyConfigured(format!("Model '{label}' is not registered."))
        })
    }

    /// Returns the model and field a relation on `owner` points at.
    ///
    /// The target is the field named by `to_field`, or the target model's
    /// primary key. A target of `"self"` refers to `owner`.
    pub fn related_field<'a>(
        &'a self,
        owner: &'a ModelSchema,
        field: &FieldDef,
    ) -> FieldResult<(&'a ModelSchema, &'a FieldDef)> {
        let rel = field.field_type.relation().ok_or_else(|| {
            FieldError::ImproperlyConfigured(format!("Field '{}' is not a relation.", field.name))
        })?;

        let target_model = if rel.to.eq_ignore_ascii_case("self") {
            owner
        } else {
            self.model(&rel.to)?
        };

        let target = match &rel.to_field {
            Some(name) => lookup_field(target_model, name)?,
            None => target_model.pk().ok_or_else(|| {
                FieldError::ImproperlyConfigured(format!(
                    "Model '{}' has no primary key for '{}' to reference.",
                    target_model.label(),
                    field.name
                ))
            })?,
        };
        Ok((target_model, target))
    }

    /// Resolves the column type of `model.field` on `connection`.
    pub fn db_type(&self, model: &str, field: &str, connection: &Connection) -> FieldResult<String> {
        let schema = self.model(model)?;
        let declared = lookup_field(schema, field)?;
        self.resolve(schema, declared, connection, &mut Vec::new())
    }

    /// Resolves every column of `model`, in declaration order, as
    /// `(column, type)` pairs for DDL generation.
    pub fn column_types(
        &self,
        model: &str,
        connection: &Connection,
    ) -> FieldResult<Vec<(String, String)>> {
        let schema = self.model(model)?;
        let span = schema_span(&schema.label());
        let _guard = span.enter();

        schema
            .fields
            .iter()
            .map(|f| {
                let ty = self.resolve(schema, f, connection, &mut Vec::new())?;
                Ok((f.column.clone(), ty))
            })
            .collect()
    }

    /// Converts a raw stored value read from `model.field`.
    ///
    /// Relation fields coerce with the hook of the field they ultimately
    /// reference.
    pub fn to_python(&self, model: &str, field: &str, value: Value) -> FieldResult<Value> {
        let mut schema = self.model(model)?;
        let mut current = lookup_field(schema, field)?;
        let mut visited: Vec<&FieldDef> = Vec::new();

        while current.is_relation() {
            check_cycle(&mut visited, current)?;
            let (next_schema, next) = self.related_field(schema, current)?;
            schema = next_schema;
            current = next;
        }
        coercion::to_python(current, value)
    }

    fn resolve<'a>(
        &'a self,
        schema: &'a ModelSchema,
        field: &'a FieldDef,
        connection: &Connection,
        visited: &mut Vec<&'a FieldDef>,
    ) -> FieldResult<String> {
        if !field.is_relation() {
            return resolver::db_type(field, None, connection);
        }

        check_cycle(visited, field)?;
        let (target_schema, target) = self.related_field(schema, field)?;
        resolver::relation_type_with(field, target, connection, |_| {
            self.resolve(target_schema, target, connection, visited)
        })
    }
}

fn lookup_field<'a>(model: &'a ModelSchema, name: &str) -> FieldResult<&'a FieldDef> {
    model.get_field(name).ok_or_else(|| {
        FieldError::ImproperlyConfigured(format!(
            "Model '{}' has no field named '{name}'.",
            model.label()
        ))
    })
}

fn check_cycle<'a>(visited: &mut Vec<&'a FieldDef>, field: &'a FieldDef) -> FieldResult<()> {
    if visited.iter().any(|seen| std::ptr::eq(*seen, field)) {
        return Err(FieldError::ImproperlyConfigured(format!(
            "Relation '{}' refers back to itself.",
            field.name
        )));
    }
    visited.push(field);
    Ok(())
}
