//! Inheritance merging.
//!
//! Walks a definition's bases in reverse declaration order, pulling fields
//! forward from model parents (via the copy-from-parent path) and from
//! plain mixins. Mixin extraction results are cached on the context, keyed
//! by mixin name and written at most once, so merging the same mixin into
//! several models never re-extracts and never mutates the mixin itself.

use std::collections::BTreeSet;
use std::sync::Arc;

use ormkit_core::{DefinitionError, FieldDescriptor, SignalEmitter};

use crate::clone::{copy_from_parent, merge_field_maps, merge_record_fields};
use crate::extract::{ExtractedNamespace, split_namespace};
use crate::namespace::{Base, MetaDef, Mixin, ModelDef};
use crate::record::RecordField;
use crate::registry::OrmContext;

/// The result of extracting a definition's own namespace and merging every
/// base into it.
pub(crate) struct MergedDef {
    /// Effective meta block, with knobs propagated from model parents.
    pub meta: MetaDef,
    /// Merged field descriptors, parents first, own declarations winning.
    pub fields: Vec<FieldDescriptor>,
    /// Merged record-layer view.
    pub record_fields: Vec<RecordField>,
    /// Merged property-field names.
    pub properties: BTreeSet<String>,
    /// Signal emitter inherited from the first model parent, if any.
    pub parent_signals: Option<SignalEmitter>,
}

/// Merge one mixin base, through the per-context extraction cache.
fn merge_mixin(
    mixin: &Mixin,
    model_fields: &mut Vec<FieldDescriptor>,
    record_fields: &mut Vec<RecordField>,
    properties: &mut BTreeSet<String>,
    ctx: &OrmContext,
) {
    let extracted = match ctx.get_parsed(&mixin.name) {
        Some(cached) => cached,
        None => {
            let fresh = split_namespace(&mixin.namespace);
            tracing::debug!(mixin = %mixin.name, fields = fresh.fields.len(), "Extracted mixin fields");
            ctx.store_parsed(&mixin.name, fresh.clone());
            fresh
        }
    };
    let ExtractedNamespace {
        record_fields: base_records,
        fields: base_fields,
        properties: base_props,
    } = extracted;

    *model_fields = merge_field_maps(base_fields, std::mem::take(model_fields));
    *record_fields = merge_record_fields(base_records, std::mem::take(record_fields));
    properties.extend(base_props);
}

/// Extract a definition's own namespace and merge all bases into it.
pub(crate) fn merge_bases(
    def: &ModelDef,
    ctx: &Arc<OrmContext>,
) -> Result<MergedDef, DefinitionError> {
    let own = split_namespace(&def.namespace);
    let mut model_fields = own.fields;
    let mut record_fields = own.record_fields;
    let mut properties = own.properties;

    let has_model_base = def
        .bases
        .iter()
        .any(|base| matches!(base, Base::Model(_)));

    // A definition inheriting from a model implicitly carries a schema
    // block even when it declares none of its own.
    let mut meta = match (&def.meta, has_model_base) {
        (Some(meta), _) => meta.clone(),
        (None, true) => MetaDef::new(),
        (None, false) => {
            return Err(DefinitionError::MissingMeta {
                model: def.name.clone(),
            });
        }
    };

    let child_tablename = def.resolved_tablename();

    for base in def.bases.iter().rev() {
        match base {
            Base::Model(parent) => {
                copy_from_parent(
                    parent,
                    &def.name,
                    &child_tablename,
                    &mut meta,
                    &mut model_fields,
                    &mut record_fields,
                    &mut properties,
                    ctx,
                )?;
            }
            Base::Mixin(mixin) => {
                merge_mixin(
                    mixin,
                    &mut model_fields,
                    &mut record_fields,
                    &mut properties,
                    ctx,
                );
            }
        }
    }

    let parent_signals = def.bases.iter().find_map(|base| match base {
        Base::Model(parent) => Some(parent.signals().clone()),
        Base::Mixin(_) => None,
    });

    Ok(MergedDef {
        meta,
        fields: model_fields,
        record_fields,
        properties,
        parent_signals,
    })
}
