//! Relationship expansion and alias registration.
//!
//! After a concrete model's table is populated, every forward relation
//! field gets a synthesized reverse field on its target model, association
//! models get their two foreign key columns filled in and their tables
//! repopulated, and every table pair the model can join through is given
//! an alias in the shared registry.

use std::sync::Arc;

use ormkit_core::{
    DefinitionError, FieldDescriptor, FieldKind, RelationDef, Relationship, RelationshipKind,
};

use crate::populate;
use crate::registry::OrmContext;
use crate::schema::Model;

/// The reverse field name for a forward relation: the explicit
/// `related_name`, or the lowercased owner name pluralized with `s`.
fn reverse_name(owner: &str, rel: &RelationDef) -> String {
    rel.related_name
        .clone()
        .unwrap_or_else(|| format!("{}s", owner.to_lowercase()))
}

/// Build the virtual reverse descriptor placed on the target model.
fn reverse_field(owner: &str, field: &FieldDescriptor, name: String) -> FieldDescriptor {
    let rel = RelationDef {
        target: owner.to_string(),
        related_name: Some(field.name.clone()),
        through: field.relation().and_then(|r| r.through.clone()),
        virtual_: true,
    };
    let mut reverse = FieldDescriptor::big_integer(name).nullable(true);
    reverse.kind = if field.is_many_to_many() {
        FieldKind::ManyToMany(rel)
    } else {
        FieldKind::ForeignKey(rel)
    };
    reverse
}

/// Whether an existing field on the target is the reverse of this exact
/// forward field, making re-expansion idempotent. A reverse synthesized
/// for a different forward field is a name clash, even when owner and
/// target coincide.
fn is_same_reverse(existing: &FieldDescriptor, owner: &str, forward: &FieldDescriptor) -> bool {
    existing.is_virtual()
        && existing.is_many_to_many() == forward.is_many_to_many()
        && existing.relation().is_some_and(|rel| {
            rel.target == owner && rel.related_name.as_deref() == Some(forward.name.as_str())
        })
}

/// Ensure the association model carries a foreign key field for the given
/// endpoint, named after the lowercased endpoint model.
fn ensure_through_fk(through: &Model, endpoint: &str) {
    let fk_name = endpoint.to_lowercase();
    if through.meta.get_field(&fk_name).is_some() {
        return;
    }
    through
        .meta
        .add_field(FieldDescriptor::foreign_key(fk_name, endpoint).nullable(true));
}

/// Synthesize reverse fields on the targets of every forward relation
/// field, and fill in association-model foreign keys.
///
/// For a many-to-many field the association model gets one foreign key per
/// endpoint and its table is recomputed and swapped in the shared metadata
/// container, so the registered schema always carries the key columns.
pub(crate) fn expand_reverse_relationships(
    model: &Model,
    ctx: &Arc<OrmContext>,
) -> Result<(), DefinitionError> {
    for field in model.relation_fields() {
        if field.is_virtual() {
            continue;
        }
        let Some(rel) = field.relation().cloned() else {
            continue;
        };
        let target = ctx
            .get_model(&rel.target)
            .ok_or_else(|| DefinitionError::UnknownTarget {
                model: model.name.clone(),
                field: field.name.clone(),
                target: rel.target.clone(),
            })?;

        let name = reverse_name(&model.name, &rel);
        match target.meta.get_field(&name) {
            Some(existing) => {
                if !is_same_reverse(&existing, &model.name, &field) {
                    return Err(DefinitionError::ReverseNameClash {
                        target: target.name.clone(),
                        name,
                    });
                }
            }
            None => {
                tracing::debug!(
                    owner = %model.name,
                    target = %target.name,
                    reverse = %name,
                    "Registered reverse relation field"
                );
                target.meta.add_field(reverse_field(&model.name, &field, name));
            }
        }

        if field.is_many_to_many() {
            // The constructor guarantees a through name on m2m fields.
            let Some(through_name) = rel.through.as_deref() else {
                continue;
            };
            let through = ctx.get_model(through_name).ok_or_else(|| {
                DefinitionError::UnknownTarget {
                    model: model.name.clone(),
                    field: field.name.clone(),
                    target: through_name.to_string(),
                }
            })?;
            ensure_through_fk(&through, &model.name);
            ensure_through_fk(&through, &target.name);
            populate::rebuild_table(&through, ctx)?;
        }
    }
    Ok(())
}

/// Register join aliases for every table pair the model's forward
/// relations can reach: owner-target for foreign keys, owner-through and
/// through-target for many-to-many fields.
pub(crate) fn register_aliases(model: &Model, ctx: &OrmContext) {
    let owner_table = model.meta.tablename.as_str();
    for field in model.relation_fields() {
        if field.is_virtual() {
            continue;
        }
        let Some(rel) = field.relation() else {
            continue;
        };
        let Some(target) = ctx.get_model(&rel.target) else {
            continue;
        };
        let target_table = target.meta.tablename.as_str();

        if field.is_many_to_many() {
            let through_table = rel
                .through
                .as_deref()
                .and_then(|name| ctx.get_model(name))
                .map(|through| through.meta.tablename.clone());
            if let Some(through_table) = through_table {
                ctx.aliases().resolve(owner_table, &through_table);
                ctx.aliases().resolve(&through_table, target_table);
            }
        } else {
            ctx.aliases().resolve(owner_table, target_table);
        }
    }
}

/// The directed relationship edges a model's fields define, forward and
/// reverse.
#[must_use]
pub fn relationships_of(model: &Model, ctx: &OrmContext) -> Vec<Relationship> {
    model
        .relation_fields()
        .into_iter()
        .filter_map(|field| {
            let rel = field.relation()?.clone();
            let forward_kind = if field.is_many_to_many() {
                RelationshipKind::ManyToMany
            } else {
                RelationshipKind::ManyToOne
            };
            let kind = if field.is_virtual() {
                forward_kind.reversed()
            } else {
                forward_kind
            };
            let mut edge = Relationship::new(&model.name, &field.name, &rel.target, kind);
            if let Some(through) = &rel.through {
                if let Some(through_model) = ctx.get_model(through) {
                    edge = edge.through_table(through_model.meta.tablename.clone());
                }
            }
            Some(edge)
        })
        .collect()
}
