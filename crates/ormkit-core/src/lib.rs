//! Core types for ormkit model construction.
//!
//! `ormkit-core` is the foundation layer: it defines the declarative field
//! descriptors, relationship metadata, signal hooks, validation helpers,
//! and error taxonomy that the construction pipeline in `ormkit` operates
//! on.
//!
//! # Role In The Architecture
//!
//! - **Data model**: `FieldDescriptor` and `SqlType` describe one model
//!   attribute's semantic type, constraints, and relational role.
//! - **Relationships**: `Relationship` edges and `RelationshipKind` are
//!   produced during relationship expansion and consumed by the query
//!   layer.
//! - **Hooks**: `SignalEmitter` carries the six predefined per-model
//!   signals; `validate` backs the choices/pattern pre-validation hooks.
//! - **Errors**: `DefinitionError` for construction-time failures (fail
//!   fast, no retry), `ValidationError` for record-validation failures.
//!
//! Most applications should use the `ormkit` facade; reach for
//! `ormkit-core` directly when writing drivers or advanced integrations.

pub mod error;
pub mod field;
pub mod relationship;
pub mod signals;
pub mod types;
pub mod validate;

pub use error::{DefinitionError, ValidationError};
pub use field::{FieldDescriptor, FieldKind, RelationDef};
pub use relationship::{Relationship, RelationshipKind};
pub use signals::{RecordData, Receiver, Signal, SignalEmitter};
pub use types::SqlType;
pub use validate::{check_choices, check_pattern, matches_pattern};
