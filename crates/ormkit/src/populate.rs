//! Schema population: deriving the canonical relational schema from a
//! model's merged field descriptors.
//!
//! Runs only for non-abstract models. Produces one column per non-relation
//! field, a single key column per forward foreign key, and no column for
//! many-to-many or virtual reverse fields. Validates the single-primary-key
//! rule, column alias uniqueness, and that every table-level constraint
//! still resolves to live column aliases after inheritance renaming.

use std::sync::Arc;

use ormkit_core::{DefinitionError, FieldDescriptor, FieldKind};

use crate::registry::OrmContext;
use crate::schema::{ColumnDef, Model, TableSchema};

/// Derive the column list for the given merged field set.
///
/// Foreign key columns reference the target table's primary key column,
/// which requires the target model to be registered and populated.
pub(crate) fn build_columns(
    model_name: &str,
    fields: &[FieldDescriptor],
    ctx: &OrmContext,
) -> Result<Vec<ColumnDef>, DefinitionError> {
    let mut columns: Vec<ColumnDef> = Vec::new();
    for field in fields {
        if !field.has_column() {
            continue;
        }
        let alias = field.get_alias().to_string();
        if columns.iter().any(|c| c.name == alias) {
            return Err(DefinitionError::DuplicateColumn {
                model: model_name.to_string(),
                alias,
            });
        }

        let foreign_key = match &field.kind {
            FieldKind::ForeignKey(rel) => {
                let target = ctx.get_model(&rel.target).ok_or_else(|| {
                    DefinitionError::UnknownTarget {
                        model: model_name.to_string(),
                        field: field.name.clone(),
                        target: rel.target.clone(),
                    }
                })?;
                let table = target.meta.table().ok_or_else(|| {
                    DefinitionError::UnknownTarget {
                        model: model_name.to_string(),
                        field: field.name.clone(),
                        target: rel.target.clone(),
                    }
                })?;
                let pk_alias = table
                    .columns
                    .iter()
                    .find(|c| c.primary_key)
                    .map_or_else(|| table.pkname.clone(), |c| c.name.clone());
                Some(format!("{}.{}", table.name, pk_alias))
            }
            FieldKind::Column | FieldKind::ManyToMany(_) => None,
        };

        columns.push(ColumnDef {
            name: alias,
            sql_type: field.sql_type.clone(),
            nullable: field.nullable,
            primary_key: field.primary_key,
            auto_increment: field.auto_increment,
            unique: field.unique,
            default: field.default.clone(),
            foreign_key,
        });
    }
    Ok(columns)
}

/// Find the single primary key field name, or fail.
fn resolve_pkname(
    model_name: &str,
    fields: &[FieldDescriptor],
) -> Result<String, DefinitionError> {
    let pk_fields: Vec<&FieldDescriptor> =
        fields.iter().filter(|f| f.primary_key).collect();
    match pk_fields.as_slice() {
        [] => Err(DefinitionError::MissingPrimaryKey {
            model: model_name.to_string(),
        }),
        [only] => Ok(only.name.clone()),
        many => Err(DefinitionError::MultiplePrimaryKeys {
            model: model_name.to_string(),
            fields: many.iter().map(|f| f.name.clone()).collect(),
        }),
    }
}

/// Populate the model's table schema and register it in the shared
/// metadata container (iff a table of that name is not already present).
pub(crate) fn populate_table(
    model: &Model,
    ctx: &OrmContext,
) -> Result<Arc<TableSchema>, DefinitionError> {
    let fields = model.meta.fields();
    let pkname = resolve_pkname(&model.name, &fields)?;
    let columns = build_columns(&model.name, &fields, ctx)?;

    // Every constraint column must still resolve to a live alias after any
    // field renaming done during inheritance merging.
    for constraint in &model.meta.constraints {
        let dangling = constraint
            .columns()
            .iter()
            .any(|col| !columns.iter().any(|c| &c.name == col));
        if dangling {
            return Err(DefinitionError::DanglingConstraint {
                model: model.name.clone(),
                columns: constraint.columns().to_vec(),
            });
        }
    }

    let table = Arc::new(TableSchema {
        name: model.meta.tablename.clone(),
        columns,
        pkname,
        constraints: model.meta.constraints.clone(),
    });

    tracing::debug!(
        model = %model.name,
        table = %table.name,
        pk = %table.pkname,
        columns = table.columns.len(),
        "Populated table schema"
    );

    model.meta.set_table(Arc::clone(&table));
    ctx.register_table_if_absent(Arc::clone(&table));
    Ok(table)
}

/// Recompute a model's table schema from its current fields and swap the
/// registration in place.
///
/// Used when relationship expansion repopulates an association table's
/// foreign key columns. The swap is a single map insertion, so a reader
/// sees the old or the new complete schema, never a partial one.
pub(crate) fn rebuild_table(
    model: &Model,
    ctx: &OrmContext,
) -> Result<Arc<TableSchema>, DefinitionError> {
    let fields = model.meta.fields();
    let pkname = resolve_pkname(&model.name, &fields)?;
    let columns = build_columns(&model.name, &fields, ctx)?;

    let table = Arc::new(TableSchema {
        name: model.meta.tablename.clone(),
        columns,
        pkname,
        constraints: model.meta.constraints.clone(),
    });
    model.meta.set_table(Arc::clone(&table));
    ctx.replace_table(Arc::clone(&table));
    Ok(table)
}
