//! Model definitions as explicit data.
//!
//! A model declaration is a `ModelDef`: a named namespace of attributes
//! (field descriptors, plain annotations, computed properties), an optional
//! meta block, and a list of bases to inherit from. Bases are either
//! previously constructed models or plain mixins that donate fields.

use std::sync::Arc;

use ormkit_core::{FieldDescriptor, SqlType};

use crate::schema::{Model, UniqueColumns};

/// One attribute in a model namespace.
#[derive(Debug, Clone)]
pub enum Attribute {
    /// A declarative field descriptor.
    Field(FieldDescriptor),
    /// A plain type annotation with no descriptor. Becomes a record field
    /// but no column.
    Annotation { sql_type: SqlType, nullable: bool },
    /// A computed property, exposed in record dumps.
    Property,
}

/// A model class body: attribute name to attribute value, in declaration
/// order.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    attrs: Vec<(String, Attribute)>,
}

impl Namespace {
    /// Create an empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field descriptor. The attribute name is the descriptor's name.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.attrs.push((field.name.clone(), Attribute::Field(field)));
        self
    }

    /// Add a plain type annotation.
    #[must_use]
    pub fn annotation(mut self, name: impl Into<String>, sql_type: SqlType, nullable: bool) -> Self {
        self.attrs
            .push((name.into(), Attribute::Annotation { sql_type, nullable }));
        self
    }

    /// Add a computed property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.attrs.push((name.into(), Attribute::Property));
        self
    }

    /// Attributes in declaration order.
    #[must_use]
    pub fn attrs(&self) -> &[(String, Attribute)] {
        &self.attrs
    }
}

/// A field-donor base that is not itself a model.
///
/// Mixins carry field descriptors that can be merged into any number of
/// models; they never get a table of their own.
#[derive(Debug, Clone)]
pub struct Mixin {
    pub name: String,
    pub namespace: Namespace,
}

impl Mixin {
    /// Create a named mixin around a namespace.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }
}

/// The schema-declaration block of a model definition.
#[derive(Debug, Clone, Default)]
pub struct MetaDef {
    /// Explicit table name. Defaults to the lowercased model name plus `s`.
    pub tablename: Option<String>,
    /// Abstract models get no table and serve only as bases.
    pub abstract_: bool,
    /// Database connection identifier, propagated from parents when unset.
    pub database: Option<String>,
    /// Table-level uniqueness constraints.
    pub constraints: Vec<UniqueColumns>,
}

impl MetaDef {
    /// Create an empty meta block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit table name.
    #[must_use]
    pub fn tablename(mut self, name: impl Into<String>) -> Self {
        self.tablename = Some(name.into());
        self
    }

    /// Mark the model abstract.
    #[must_use]
    pub fn abstract_(mut self, value: bool) -> Self {
        self.abstract_ = value;
        self
    }

    /// Set the database connection identifier.
    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Add a table-level uniqueness constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: UniqueColumns) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// A base class of a model definition.
#[derive(Debug, Clone)]
pub enum Base {
    /// A previously constructed model. Only abstract models may donate
    /// fields to a subclass that declares new ones.
    Model(Arc<Model>),
    /// A plain mixin carrying field descriptors.
    Mixin(Arc<Mixin>),
}

/// A complete model declaration, ready to be built.
#[derive(Debug, Clone)]
pub struct ModelDef {
    pub name: String,
    pub meta: Option<MetaDef>,
    pub namespace: Namespace,
    pub bases: Vec<Base>,
}

impl ModelDef {
    /// Start a definition for a model with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meta: None,
            namespace: Namespace::new(),
            bases: Vec::new(),
        }
    }

    /// Attach the meta block.
    #[must_use]
    pub fn meta(mut self, meta: MetaDef) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Add a field descriptor to the namespace.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.namespace = self.namespace.field(field);
        self
    }

    /// Add a plain annotation to the namespace.
    #[must_use]
    pub fn annotation(mut self, name: impl Into<String>, sql_type: SqlType, nullable: bool) -> Self {
        self.namespace = self.namespace.annotation(name, sql_type, nullable);
        self
    }

    /// Add a computed property to the namespace.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.namespace = self.namespace.property(name);
        self
    }

    /// Inherit from a previously constructed model.
    #[must_use]
    pub fn extends(mut self, base: Arc<Model>) -> Self {
        self.bases.push(Base::Model(base));
        self
    }

    /// Inherit fields from a mixin.
    #[must_use]
    pub fn with_mixin(mut self, mixin: Arc<Mixin>) -> Self {
        self.bases.push(Base::Mixin(mixin));
        self
    }

    /// The table name this definition resolves to: the explicit override,
    /// or the lowercased model name pluralized with `s`.
    #[must_use]
    pub fn resolved_tablename(&self) -> String {
        self.meta
            .as_ref()
            .and_then(|meta| meta.tablename.clone())
            .unwrap_or_else(|| format!("{}s", self.name.to_lowercase()))
    }
}
