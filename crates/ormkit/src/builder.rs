//! Model construction pipeline.
//!
//! `build_model` is the single entry point that turns an explicit
//! `ModelDef` into a constructed `Model` registered on the shared context.
//! The stages run in a fixed order:
//!
//! 1. extract the definition's own namespace and merge every base into it
//! 2. build the validation record type and its pre-validation hooks
//! 3. assemble schema metadata and register the model
//! 4. for concrete models: populate the table, expand reverse
//!    relationships, register join aliases, synthesize the primary key
//!    record attribute, and attach the query entry point
//!
//! Abstract models stop after registration: they carry fields and signals
//! for their subclasses but never get a table or a queryset.
//!
//! Failures surface as `DefinitionError` and leave the context with
//! whatever registrations completed before the failing stage; declaration
//! order at startup is expected to treat any definition error as fatal.

use std::sync::Arc;

use serde_json::Value;

use ormkit_core::{
    DefinitionError, FieldDescriptor, SignalEmitter, check_choices, check_pattern,
};

use crate::merge::merge_bases;
use crate::namespace::ModelDef;
use crate::populate::populate_table;
use crate::queryset::QuerySet;
use crate::record::{PreValidator, RecordConfig, RecordField, RecordType};
use crate::registry::OrmContext;
use crate::relations::{expand_reverse_relationships, register_aliases};
use crate::schema::{Meta, Model};

/// Build the choices hook over every field that declares a choices set.
///
/// Record field names follow the lowercase naming policy, so hook keys are
/// lowercased the same way.
fn choices_validator(fields: &[FieldDescriptor]) -> Option<PreValidator> {
    let checks: Vec<(String, Vec<Value>)> = fields
        .iter()
        .filter(|f| f.has_choices())
        .map(|f| (f.name.to_lowercase(), f.choices.clone()))
        .collect();
    if checks.is_empty() {
        return None;
    }
    Some(PreValidator::new("choices", move |data| {
        for (name, choices) in &checks {
            check_choices(name, data.get(name), choices)?;
        }
        Ok(())
    }))
}

/// Build the pattern hook over every field that declares a regex pattern.
fn pattern_validator(fields: &[FieldDescriptor]) -> Option<PreValidator> {
    let checks: Vec<(String, String)> = fields
        .iter()
        .filter_map(|f| f.pattern.clone().map(|p| (f.name.to_lowercase(), p)))
        .collect();
    if checks.is_empty() {
        return None;
    }
    Some(PreValidator::new("pattern", move |data| {
        for (name, pattern) in &checks {
            check_pattern(name, data.get(name), pattern)?;
        }
        Ok(())
    }))
}

/// Construct a model from its definition and register it on the context.
///
/// # Errors
///
/// Returns a `DefinitionError` when the definition violates a construction
/// rule: missing meta, subclassing a concrete model with new fields,
/// unresolvable relation targets, primary key violations, duplicate column
/// aliases, constraints over missing columns, or a reverse-name clash on a
/// relation target.
pub fn build_model(def: ModelDef, ctx: &Arc<OrmContext>) -> Result<Arc<Model>, DefinitionError> {
    let merged = merge_bases(&def, ctx)?;
    let tablename = merged
        .meta
        .tablename
        .clone()
        .unwrap_or_else(|| format!("{}s", def.name.to_lowercase()));

    tracing::debug!(
        model = %def.name,
        table = %tablename,
        abstract_ = merged.meta.abstract_,
        fields = merged.fields.len(),
        "Building model"
    );

    let mut record = RecordType::new(
        def.name.clone(),
        merged.record_fields,
        RecordConfig::orm_default(),
    );
    if let Some(validator) = choices_validator(&merged.fields) {
        record.add_pre_validator(validator);
    }
    if let Some(validator) = pattern_validator(&merged.fields) {
        record.add_pre_validator(validator);
    }

    let signals = merged.parent_signals.unwrap_or_else(SignalEmitter::new);

    let meta = Meta::new(
        def.name.clone(),
        tablename.clone(),
        merged.meta.abstract_,
        merged.meta.database,
        merged.meta.constraints,
        merged.properties,
        merged.fields,
    );

    let model = Arc::new(Model::new(meta, record, signals));
    ctx.register_model(Arc::clone(&model));

    if model.meta.abstract_ {
        return Ok(model);
    }

    populate_table(&model, ctx)?;
    expand_reverse_relationships(&model, ctx)?;
    register_aliases(&model, ctx);

    // An inherited primary key may exist only as a descriptor; mirror it
    // into the record layer so validated records can carry the key.
    if let Some(pkname) = model.meta.pkname() {
        // The record layer lowercases field names; look the key up under
        // the same policy so a mixed-case declaration is not duplicated.
        let record_key = pkname.to_lowercase();
        let missing = !model.record().has_field(&record_key);
        if missing {
            let sql_type = model
                .meta
                .get_field(&pkname)
                .map_or(ormkit_core::SqlType::Integer, |f| f.sql_type);
            model.record_mut().add_field(RecordField {
                name: record_key,
                sql_type,
                nullable: true,
                default: None,
            });
        }
    }

    model.attach_queryset(QuerySet::new(
        def.name.clone(),
        tablename,
        Arc::clone(ctx),
    ));

    tracing::debug!(model = %model.name, "Constructed model");
    Ok(model)
}
