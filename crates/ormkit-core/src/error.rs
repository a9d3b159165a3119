//! Error types for model construction and record validation.
//!
//! Construction errors are fail-fast: they are raised synchronously while a
//! model is being built and are expected to abort program startup. There is
//! no retry path and no partial-registration recovery.

use std::error::Error as StdError;
use std::fmt;

/// Errors raised while a model definition is being constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A concrete (non-abstract) model was subclassed with new fields.
    IllegalSubclassing { child: String, base: String },
    /// A definition carries field descriptors but no meta declaration.
    MissingMeta { model: String },
    /// A uniqueness constraint names a column alias that does not exist
    /// in the merged field set.
    DanglingConstraint { model: String, columns: Vec<String> },
    /// No field in the merged set is marked as primary key.
    MissingPrimaryKey { model: String },
    /// More than one field in the merged set is marked as primary key.
    MultiplePrimaryKeys { model: String, fields: Vec<String> },
    /// Two fields resolve to the same column alias.
    DuplicateColumn { model: String, alias: String },
    /// A relation field points at a model that was never registered.
    UnknownTarget {
        model: String,
        field: String,
        target: String,
    },
    /// A synthesized reverse-relation name collides with an existing
    /// relation field on the target model.
    ReverseNameClash { target: String, name: String },
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionError::IllegalSubclassing { child, base } => {
                write!(f, "{} cannot inherit from non abstract model {}", child, base)
            }
            DefinitionError::MissingMeta { model } => {
                write!(f, "model {} declares fields but has no meta block", model)
            }
            DefinitionError::DanglingConstraint { model, columns } => {
                write!(
                    f,
                    "unique constraint {:?} on {} has column names that are not \
                     in the model fields; check columns redefined in subclasses",
                    columns, model
                )
            }
            DefinitionError::MissingPrimaryKey { model } => {
                write!(f, "model {} has no primary key field", model)
            }
            DefinitionError::MultiplePrimaryKeys { model, fields } => {
                write!(
                    f,
                    "model {} has multiple primary key fields: {:?}",
                    model, fields
                )
            }
            DefinitionError::DuplicateColumn { model, alias } => {
                write!(f, "model {} has duplicate column alias '{}'", model, alias)
            }
            DefinitionError::UnknownTarget {
                model,
                field,
                target,
            } => {
                write!(
                    f,
                    "relation field {}.{} points at unknown model {}",
                    model, field, target
                )
            }
            DefinitionError::ReverseNameClash { target, name } => {
                write!(
                    f,
                    "reverse relation name '{}' already taken on model {}",
                    name, target
                )
            }
        }
    }
}

impl StdError for DefinitionError {}

/// Errors raised while validating a record against a model's field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A field value is outside its declared choices set.
    ChoiceViolation {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
    /// A string value does not match the field's declared pattern.
    PatternMismatch { field: String, pattern: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::ChoiceViolation {
                field,
                value,
                allowed,
            } => {
                write!(
                    f,
                    "{}: '{}' not in allowed choices set: {:?}",
                    field, value, allowed
                )
            }
            ValidationError::PatternMismatch { field, pattern } => {
                write!(f, "{}: value does not match pattern '{}'", field, pattern)
            }
        }
    }
}

impl StdError for ValidationError {}
