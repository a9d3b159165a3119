//! The validated-record boundary.
//!
//! The construction pipeline hands the merged field view to a record
//! builder that produces a `RecordType`: the validation-schema side of a
//! model. The full validation engine is an external collaborator; this
//! module carries the narrow contract the pipeline owns: a canonical
//! configuration shared by every model (extra fields allowed, lowercase
//! naming), default filling, and the pre-validation hooks (choices,
//! patterns) the pipeline registers.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use ormkit_core::{RecordData, SqlType, ValidationError};

/// How unknown keys in incoming data are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraFields {
    /// Keep unknown keys in the validated record.
    #[default]
    Allow,
    /// Drop unknown keys.
    Ignore,
}

/// Record-layer configuration. Identical across all models built by the
/// pipeline.
#[derive(Debug, Clone, Copy)]
pub struct RecordConfig {
    /// Unknown-key policy. The pipeline always uses `Allow`.
    pub extra: ExtraFields,
    /// Canonical naming policy: field names are lowercased.
    pub lowercase_names: bool,
}

impl RecordConfig {
    /// The configuration the construction pipeline uses for every model.
    #[must_use]
    pub fn orm_default() -> Self {
        Self {
            extra: ExtraFields::Allow,
            lowercase_names: true,
        }
    }
}

/// One field in the validation view of a model.
#[derive(Debug, Clone)]
pub struct RecordField {
    pub name: String,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub default: Option<Value>,
}

/// A named pre-validation hook, run before per-field validation.
#[derive(Clone)]
pub struct PreValidator {
    name: &'static str,
    func: Arc<dyn Fn(&RecordData) -> Result<(), ValidationError> + Send + Sync>,
}

impl PreValidator {
    /// Create a named hook. The name keys idempotent registration.
    pub fn new<F>(name: &'static str, func: F) -> Self
    where
        F: Fn(&RecordData) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        Self {
            name,
            func: Arc::new(func),
        }
    }

    /// The registration key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for PreValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreValidator").field("name", &self.name).finish()
    }
}

/// The validation-schema side of a constructed model.
#[derive(Debug, Clone)]
pub struct RecordType {
    pub name: String,
    pub config: RecordConfig,
    fields: Vec<RecordField>,
    pre_validators: Vec<PreValidator>,
}

impl RecordType {
    pub(crate) fn new(name: String, mut fields: Vec<RecordField>, config: RecordConfig) -> Self {
        if config.lowercase_names {
            for field in &mut fields {
                field.name = field.name.to_lowercase();
            }
        }
        Self {
            name,
            config,
            fields,
            pre_validators: Vec::new(),
        }
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    /// Whether the record type declares a field with this name.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Append a field. Used when the pipeline synthesizes the primary key
    /// record attribute for an inherited key.
    pub(crate) fn add_field(&mut self, field: RecordField) {
        self.fields.push(field);
    }

    /// Register a pre-validation hook. Registration is idempotent: a hook
    /// whose name is already present is skipped.
    pub(crate) fn add_pre_validator(&mut self, validator: PreValidator) {
        if self.pre_validators.iter().any(|v| v.name == validator.name) {
            return;
        }
        self.pre_validators.push(validator);
    }

    /// Names of the registered pre-validation hooks.
    #[must_use]
    pub fn pre_validator_names(&self) -> Vec<&'static str> {
        self.pre_validators.iter().map(|v| v.name).collect()
    }

    /// Validate incoming data: run pre-validation hooks, fill defaults,
    /// and apply the unknown-key policy.
    pub fn validate(&self, values: &RecordData) -> Result<RecordData, ValidationError> {
        for validator in &self.pre_validators {
            (validator.func)(values)?;
        }

        let mut out = match self.config.extra {
            ExtraFields::Allow => values.clone(),
            ExtraFields::Ignore => {
                let mut kept = RecordData::new();
                for (key, value) in values {
                    if self.has_field(key) {
                        kept.insert(key.clone(), value.clone());
                    }
                }
                kept
            }
        };

        for field in &self.fields {
            if !out.contains_key(&field.name) {
                if let Some(default) = &field.default {
                    out.insert(field.name.clone(), default.clone());
                }
            }
        }

        Ok(out)
    }
}
