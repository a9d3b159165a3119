//! The ormkit model construction pipeline.
//!
//! This crate turns explicit model declarations into fully constructed
//! models: validated record types, derived table schemas, expanded
//! relationships, join aliases, and per-model signal hooks, all registered
//! on a shared [`OrmContext`].
//!
//! # Quick Start
//!
//! ```
//! use ormkit::{FieldDescriptor, MetaDef, ModelDef, OrmContext, build_model};
//!
//! let ctx = OrmContext::new();
//!
//! let author = build_model(
//!     ModelDef::new("Author")
//!         .meta(MetaDef::new())
//!         .field(FieldDescriptor::integer("id").primary_key(true))
//!         .field(FieldDescriptor::text("name")),
//!     &ctx,
//! )?;
//!
//! build_model(
//!     ModelDef::new("Post")
//!         .meta(MetaDef::new())
//!         .field(FieldDescriptor::integer("id").primary_key(true))
//!         .field(FieldDescriptor::foreign_key("author", "Author")),
//!     &ctx,
//! )?;
//!
//! // The construction pipeline synthesized a reverse field on Author.
//! assert!(author.meta.get_field("posts").is_some());
//! # Ok::<(), ormkit::DefinitionError>(())
//! ```
//!
//! # Pipeline Stages
//!
//! [`build_model`] runs extraction, inheritance merging, record-type
//! construction, schema population, relationship expansion, and alias
//! registration in a fixed order. Abstract models stop after registration
//! and serve only as field donors for their subclasses.

pub mod builder;
mod clone;
mod extract;
mod merge;
pub mod namespace;
mod populate;
pub mod queryset;
pub mod record;
pub mod registry;
pub mod relations;
pub mod schema;

pub use builder::build_model;
pub use namespace::{Attribute, Base, MetaDef, Mixin, ModelDef, Namespace};
pub use queryset::QuerySet;
pub use record::{ExtraFields, PreValidator, RecordConfig, RecordField, RecordType};
pub use registry::{AliasRegistry, OrmContext};
pub use relations::relationships_of;
pub use schema::{ColumnDef, Meta, Model, TableSchema, UniqueColumns};

pub use ormkit_core::{
    DefinitionError, FieldDescriptor, FieldKind, RecordData, RelationDef, Relationship,
    RelationshipKind, Signal, SignalEmitter, SqlType, ValidationError,
};

/// Convenience re-exports for application code.
pub mod prelude {
    pub use crate::{
        Base, DefinitionError, FieldDescriptor, MetaDef, Mixin, ModelDef, Namespace, OrmContext,
        SqlType, UniqueColumns, build_model,
    };
}
