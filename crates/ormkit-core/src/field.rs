//! Field descriptors: declarative metadata for one model attribute.
//!
//! A `FieldDescriptor` is a value, not a column. It describes the semantic
//! type, constraints, and relational role of an attribute; the construction
//! pipeline later derives actual columns from the merged descriptor set.
//! Descriptors are created by user declarations and may be cloned with a
//! renamed reverse relation when inherited into sibling subclasses.

use serde::Serialize;
use serde_json::Value;

use crate::types::SqlType;

/// The relational role of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// Plain column, no relation.
    Column,
    /// Many-to-one relation backed by a foreign key column.
    ForeignKey(RelationDef),
    /// Many-to-many relation through an association model.
    ManyToMany(RelationDef),
}

/// Relation parameters shared by foreign-key and many-to-many fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationDef {
    /// Name of the target model.
    pub target: String,
    /// Name of the auto-created reverse field on the target model.
    /// Defaults to `{owner}s` when left unset.
    pub related_name: Option<String>,
    /// Association model name (many-to-many only).
    pub through: Option<String>,
    /// True for reverse fields synthesized during relationship expansion.
    /// Virtual fields never produce a backing column.
    pub virtual_: bool,
}

/// Declarative metadata for one model attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Field name as declared on the model.
    pub name: String,
    /// Database column name override.
    pub alias: Option<String>,
    /// Semantic column type. For foreign keys this is the type of the
    /// generated key column.
    pub sql_type: SqlType,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Whether this field is the primary key.
    pub primary_key: bool,
    /// Whether the column auto-increments.
    pub auto_increment: bool,
    /// Whether the column carries a single-column unique constraint.
    pub unique: bool,
    /// Default value, if any.
    pub default: Option<Value>,
    /// Enumerated allowed values. Empty means unconstrained.
    pub choices: Vec<Value>,
    /// Optional regex pattern for string values.
    pub pattern: Option<String>,
    /// Relational role.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Create a plain column field with an explicit SQL type.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            sql_type,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            unique: false,
            default: None,
            choices: Vec::new(),
            pattern: None,
            kind: FieldKind::Column,
        }
    }

    /// Create an integer column field.
    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, SqlType::Integer)
    }

    /// Create a big-integer column field.
    #[must_use]
    pub fn big_integer(name: impl Into<String>) -> Self {
        Self::new(name, SqlType::BigInt)
    }

    /// Create a text column field.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, SqlType::Text)
    }

    /// Create a boolean column field.
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, SqlType::Boolean)
    }

    /// Create a many-to-one relation field targeting another model.
    ///
    /// The generated key column is a big integer referencing the target's
    /// primary key.
    #[must_use]
    pub fn foreign_key(name: impl Into<String>, target: impl Into<String>) -> Self {
        let mut field = Self::new(name, SqlType::BigInt);
        field.kind = FieldKind::ForeignKey(RelationDef {
            target: target.into(),
            related_name: None,
            through: None,
            virtual_: false,
        });
        field
    }

    /// Create a many-to-many relation field through an association model.
    #[must_use]
    pub fn many_to_many(
        name: impl Into<String>,
        target: impl Into<String>,
        through: impl Into<String>,
    ) -> Self {
        let mut field = Self::new(name, SqlType::BigInt);
        field.kind = FieldKind::ManyToMany(RelationDef {
            target: target.into(),
            related_name: None,
            through: Some(through.into()),
            virtual_: false,
        });
        field
    }

    /// Set the column name override.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Mark the field nullable.
    #[must_use]
    pub fn nullable(mut self, value: bool) -> Self {
        self.nullable = value;
        self
    }

    /// Mark the field as primary key.
    #[must_use]
    pub fn primary_key(mut self, value: bool) -> Self {
        self.primary_key = value;
        self
    }

    /// Mark the field auto-incrementing.
    #[must_use]
    pub fn auto_increment(mut self, value: bool) -> Self {
        self.auto_increment = value;
        self
    }

    /// Mark the field unique.
    #[must_use]
    pub fn unique(mut self, value: bool) -> Self {
        self.unique = value;
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Restrict the field to an enumerated set of allowed values.
    #[must_use]
    pub fn choices(mut self, choices: Vec<Value>) -> Self {
        self.choices = choices;
        self
    }

    /// Require string values to match a regex pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the reverse relation name (relation fields only; no-op otherwise).
    #[must_use]
    pub fn related_name(mut self, name: impl Into<String>) -> Self {
        match &mut self.kind {
            FieldKind::ForeignKey(rel) | FieldKind::ManyToMany(rel) => {
                rel.related_name = Some(name.into());
            }
            FieldKind::Column => {}
        }
        self
    }

    /// The column name this field resolves to.
    #[must_use]
    pub fn get_alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Whether this field is a relation (forward or reverse).
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        !matches!(self.kind, FieldKind::Column)
    }

    /// Relation parameters, if this is a relation field.
    #[must_use]
    pub const fn relation(&self) -> Option<&RelationDef> {
        match &self.kind {
            FieldKind::ForeignKey(rel) | FieldKind::ManyToMany(rel) => Some(rel),
            FieldKind::Column => None,
        }
    }

    /// Whether this field is a many-to-many relation.
    #[must_use]
    pub const fn is_many_to_many(&self) -> bool {
        matches!(self.kind, FieldKind::ManyToMany(_))
    }

    /// Whether this is a synthesized reverse field.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.relation().is_some_and(|rel| rel.virtual_)
    }

    /// Whether this field produces a column in the owning table.
    ///
    /// Plain columns and forward foreign keys do; many-to-many fields and
    /// virtual reverse fields do not.
    #[must_use]
    pub fn has_column(&self) -> bool {
        match &self.kind {
            FieldKind::Column => true,
            FieldKind::ForeignKey(rel) => !rel.virtual_,
            FieldKind::ManyToMany(_) => false,
        }
    }

    /// Whether this field declares a non-empty choices set.
    #[must_use]
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Clone this relation field with its reverse name suffixed by
    /// `_{suffix}`.
    ///
    /// Used when a relation field is inherited into a sibling subclass:
    /// each subclass needs a distinct reverse name on the target model.
    /// Non-relation fields are cloned unchanged.
    #[must_use]
    pub fn clone_with_related_name(&self, suffix: &str) -> Self {
        let mut copy = self.clone();
        if let FieldKind::ForeignKey(rel) | FieldKind::ManyToMany(rel) = &mut copy.kind {
            if let Some(related) = &rel.related_name {
                rel.related_name = Some(format!("{}_{}", related, suffix));
            }
        }
        copy
    }
}
