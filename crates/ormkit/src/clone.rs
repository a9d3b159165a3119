//! The copy-from-parent path of inheritance merging.
//!
//! When a model inherits from another model, the parent's fields are
//! copied into the child. Relation fields need care: every child must get
//! its own reverse-relation name on the target model, and an inherited
//! many-to-many field must get its own association table so sibling
//! subclasses do not share one. The parent's original association table is
//! retired from the shared metadata container once a clone supersedes it.

use std::collections::BTreeSet;
use std::sync::Arc;

use ormkit_core::{DefinitionError, FieldDescriptor, FieldKind};

use crate::builder::build_model;
use crate::namespace::{MetaDef, ModelDef};
use crate::record::RecordField;
use crate::registry::OrmContext;
use crate::schema::Model;

/// Merge `over` onto `base` by field name: `base` order is kept, entries
/// in `over` replace same-named entries in place, new names are appended.
pub(crate) fn merge_field_maps(
    base: Vec<FieldDescriptor>,
    over: Vec<FieldDescriptor>,
) -> Vec<FieldDescriptor> {
    let mut merged = base;
    for field in over {
        if let Some(slot) = merged.iter_mut().find(|f| f.name == field.name) {
            *slot = field;
        } else {
            merged.push(field);
        }
    }
    merged
}

/// Same merge policy for the record-layer view.
pub(crate) fn merge_record_fields(
    base: Vec<RecordField>,
    over: Vec<RecordField>,
) -> Vec<RecordField> {
    let mut merged = base;
    for field in over {
        if let Some(slot) = merged.iter_mut().find(|f| f.name == field.name) {
            *slot = field;
        } else {
            merged.push(field);
        }
    }
    merged
}

/// Clone an inherited many-to-many field for a subclass.
///
/// Builds an independent copy of the association model (foreign key fields
/// stripped; they are repopulated during relationship expansion), named and
/// tabled after the child, registers it, and retires the parent's original
/// association table from the metadata container.
fn clone_m2m_through(
    field: &FieldDescriptor,
    child_name: &str,
    child_tablename: &str,
    ctx: &Arc<OrmContext>,
) -> Result<FieldDescriptor, DefinitionError> {
    let FieldKind::ManyToMany(rel) = &field.kind else {
        return Ok(field.clone());
    };
    // The constructor guarantees a through name on m2m fields.
    let Some(through_name) = rel.through.clone() else {
        return Ok(field.clone());
    };
    let through = ctx
        .get_model(&through_name)
        .ok_or_else(|| DefinitionError::UnknownTarget {
            model: child_name.to_string(),
            field: field.name.clone(),
            target: through_name.clone(),
        })?;

    let clone_name = format!("{}{}", through_name, child_name);
    let clone_tablename = format!("{}_{}", through.meta.tablename, child_tablename);

    let mut def = ModelDef::new(clone_name.clone()).meta({
        let mut meta = MetaDef::new().tablename(clone_tablename);
        if let Some(database) = &through.meta.database {
            meta = meta.database(database.clone());
        }
        meta
    });
    for through_field in through.meta.fields() {
        // Strip foreign keys; relationship expansion repopulates them for
        // the clone's own relation.
        if matches!(through_field.kind, FieldKind::ForeignKey(_)) {
            continue;
        }
        def = def.field(through_field);
    }

    tracing::debug!(
        through = %through_name,
        clone = %clone_name,
        child = %child_name,
        "Cloning association model for subclass"
    );
    build_model(def, ctx)?;

    // The clone supersedes the parent's association table.
    ctx.remove_table(&through.meta.tablename);

    let mut copy = field.clone_with_related_name(child_tablename);
    if let FieldKind::ManyToMany(rel) = &mut copy.kind {
        rel.through = Some(clone_name);
    }
    Ok(copy)
}

/// Copy fields and schema knobs from a parent model into a child under
/// construction.
///
/// Fails when the child declares (or has accumulated) any fields while the
/// parent is not abstract: concrete models may not be extended with new
/// fields.
#[allow(clippy::too_many_arguments)]
pub(crate) fn copy_from_parent(
    parent: &Arc<Model>,
    child_name: &str,
    child_tablename: &str,
    meta: &mut MetaDef,
    model_fields: &mut Vec<FieldDescriptor>,
    record_fields: &mut Vec<RecordField>,
    properties: &mut BTreeSet<String>,
    ctx: &Arc<OrmContext>,
) -> Result<(), DefinitionError> {
    if !model_fields.is_empty() && !parent.meta.abstract_ {
        return Err(DefinitionError::IllegalSubclassing {
            child: child_name.to_string(),
            base: parent.name.clone(),
        });
    }

    // Propagate schema knobs the child leaves unset.
    if meta.database.is_none() {
        meta.database = parent.meta.database.clone();
    }
    meta.constraints.extend(parent.meta.constraints.iter().cloned());

    let mut parent_fields: Vec<FieldDescriptor> = Vec::new();
    for field in parent.meta.fields() {
        // Reverse fields synthesized onto the parent by other models'
        // expansions are not inheritable declarations.
        if field.is_virtual() {
            continue;
        }
        let copied = match &field.kind {
            FieldKind::ManyToMany(_) => {
                clone_m2m_through(&field, child_name, child_tablename, ctx)?
            }
            FieldKind::ForeignKey(rel) if rel.related_name.is_some() => {
                field.clone_with_related_name(child_tablename)
            }
            _ => field.clone(),
        };
        parent_fields.push(copied);
    }

    let parent_records: Vec<RecordField> = parent.record().fields().to_vec();

    // Child declarations win over inherited fields of the same name.
    *model_fields = merge_field_maps(parent_fields, std::mem::take(model_fields));
    *record_fields = merge_record_fields(parent_records, std::mem::take(record_fields));
    properties.extend(parent.meta.property_fields.iter().cloned());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_field_maps_child_wins_in_place() {
        let base = vec![
            FieldDescriptor::integer("id").primary_key(true),
            FieldDescriptor::text("name"),
        ];
        let over = vec![FieldDescriptor::text("name").alias("title")];
        let merged = merge_field_maps(base, over);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].name, "name");
        assert_eq!(merged[1].get_alias(), "title");
    }

    #[test]
    fn test_merge_field_maps_appends_new_names() {
        let base = vec![FieldDescriptor::integer("id").primary_key(true)];
        let over = vec![FieldDescriptor::text("extra")];
        let merged = merge_field_maps(base, over);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].name, "extra");
    }
}
