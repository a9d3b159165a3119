use std::sync::Arc;

use ormkit::prelude::*;
use ormkit::{Relationship, RelationshipKind, relationships_of};

fn build(def: ModelDef, ctx: &Arc<OrmContext>) -> Arc<ormkit::Model> {
    match build_model(def, ctx) {
        Ok(model) => model,
        Err(e) => panic!("unexpected definition error: {e}"),
    }
}

fn author_def() -> ModelDef {
    ModelDef::new("Author")
        .meta(MetaDef::new())
        .field(FieldDescriptor::integer("id").primary_key(true).auto_increment(true))
        .field(FieldDescriptor::text("name"))
}

#[test]
fn foreign_key_synthesizes_reverse_field_and_alias() {
    let ctx = OrmContext::new();
    let author = build(author_def(), &ctx);

    build(
        ModelDef::new("Post")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::text("title"))
            .field(FieldDescriptor::foreign_key("author", "Author")),
        &ctx,
    );

    // Reverse field appears on the target, virtual and columnless.
    let reverse = author.meta.get_field("posts").expect("reverse field synthesized");
    assert!(reverse.is_virtual());
    assert!(!reverse.has_column());

    // The forward key column references the target table's primary key.
    let posts = ctx.get_table("posts").expect("posts table registered");
    let fk_column = posts.get_column("author").expect("key column");
    assert_eq!(fk_column.foreign_key.as_deref(), Some("authors.id"));

    // The joined pair got an alias, queryable from either side.
    let alias = ctx.aliases().get("posts", "authors").expect("alias registered");
    assert_eq!(ctx.aliases().get("authors", "posts"), Some(alias));
}

#[test]
fn concrete_parent_with_new_fields_is_rejected() {
    let ctx = OrmContext::new();
    let author = build(author_def(), &ctx);

    let result = build_model(
        ModelDef::new("Editor")
            .meta(MetaDef::new())
            .field(FieldDescriptor::text("desk"))
            .extends(author),
        &ctx,
    );
    match result {
        Err(DefinitionError::IllegalSubclassing { child, base }) => {
            assert_eq!(child, "Editor");
            assert_eq!(base, "Author");
        }
        other => panic!("expected IllegalSubclassing, got {other:?}"),
    }
}

#[test]
fn concrete_parent_without_new_fields_is_allowed() {
    let ctx = OrmContext::new();
    let author = build(author_def(), &ctx);

    let alias_model = build(
        ModelDef::new("Writer").meta(MetaDef::new()).extends(author),
        &ctx,
    );
    assert_eq!(alias_model.meta.field_names(), vec!["id", "name"]);
    assert!(ctx.get_table("writers").is_some());
}

#[test]
fn abstract_parent_donates_fields_and_signals() {
    let ctx = OrmContext::new();
    let base = build(
        ModelDef::new("Audited")
            .meta(MetaDef::new().abstract_(true))
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::text("created_by").nullable(true)),
        &ctx,
    );
    base.signals_mut()
        .pre_save
        .connect(Arc::new(|_record: &ormkit::RecordData| {}));

    let child = build(
        ModelDef::new("Invoice")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::text("number")),
        // deliberately built without the base first to contrast below
        &ctx,
    );
    assert!(child.meta.get_field("created_by").is_none());

    let inheriting = build(
        ModelDef::new("Receipt")
            .meta(MetaDef::new())
            .field(FieldDescriptor::text("number"))
            .extends(Arc::clone(&base)),
        &ctx,
    );
    assert!(inheriting.meta.get_field("created_by").is_some());
    assert!(inheriting.meta.get_field("id").is_some());
    assert_eq!(inheriting.signals().pre_save.receiver_count(), 1);

    // The abstract base itself never got a table.
    assert!(base.meta.table().is_none());
    assert!(ctx.get_table("auditeds").is_none());
}

#[test]
fn sibling_subclasses_get_independent_association_tables() {
    let ctx = OrmContext::new();
    build(
        ModelDef::new("Category")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::text("name")),
        &ctx,
    );
    build(
        ModelDef::new("VehicleCategory")
            .meta(MetaDef::new().tablename("vehicles_x_categories"))
            .field(FieldDescriptor::integer("id").primary_key(true)),
        &ctx,
    );
    let base = build(
        ModelDef::new("Vehicle")
            .meta(MetaDef::new().abstract_(true))
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(
                FieldDescriptor::many_to_many("categories", "Category", "VehicleCategory")
                    .related_name("owners"),
            ),
        &ctx,
    );

    let truck = build(
        ModelDef::new("Truck")
            .meta(MetaDef::new())
            .field(FieldDescriptor::text("model_name"))
            .extends(Arc::clone(&base)),
        &ctx,
    );
    let van = build(
        ModelDef::new("Van")
            .meta(MetaDef::new())
            .field(FieldDescriptor::text("model_name"))
            .extends(base),
        &ctx,
    );

    // Each sibling carries its own cloned association model.
    let truck_m2m = truck.meta.get_field("categories").expect("truck m2m");
    let van_m2m = van.meta.get_field("categories").expect("van m2m");
    let truck_through = truck_m2m.relation().unwrap().through.clone().unwrap();
    let van_through = van_m2m.relation().unwrap().through.clone().unwrap();
    assert_eq!(truck_through, "VehicleCategoryTruck");
    assert_eq!(van_through, "VehicleCategoryVan");

    // The parent's association table was retired; the clones are live.
    assert!(ctx.get_table("vehicles_x_categories").is_none());
    let truck_table = ctx
        .get_table("vehicles_x_categories_trucks")
        .expect("truck association table");
    assert!(ctx.get_table("vehicles_x_categories_vans").is_some());

    // Clones were repopulated with one key column per endpoint.
    let truck_fk = truck_table.get_column("truck").expect("truck key column");
    assert_eq!(truck_fk.foreign_key.as_deref(), Some("trucks.id"));
    let category_fk = truck_table.get_column("category").expect("category key column");
    assert_eq!(category_fk.foreign_key.as_deref(), Some("categorys.id"));

    // Reverse names on the shared target stay distinct per sibling.
    let category = ctx.get_model("Category").unwrap();
    assert!(category.meta.get_field("owners_trucks").is_some());
    assert!(category.meta.get_field("owners_vans").is_some());

    // Both join legs of each sibling got aliases.
    assert!(ctx.aliases().get("trucks", "vehicles_x_categories_trucks").is_some());
    assert!(ctx
        .aliases()
        .get("vehicles_x_categories_trucks", "categorys")
        .is_some());
}

#[test]
fn conflicting_reverse_names_are_rejected() {
    let ctx = OrmContext::new();
    build(author_def(), &ctx);
    build(
        ModelDef::new("Post")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::foreign_key("author", "Author").related_name("works")),
        &ctx,
    );

    let result = build_model(
        ModelDef::new("Article")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::foreign_key("author", "Author").related_name("works")),
        &ctx,
    );
    match result {
        Err(DefinitionError::ReverseNameClash { target, name }) => {
            assert_eq!(target, "Author");
            assert_eq!(name, "works");
        }
        other => panic!("expected ReverseNameClash, got {other:?}"),
    }
}

#[test]
fn two_relations_deriving_the_same_reverse_name_are_rejected() {
    let ctx = OrmContext::new();
    build(author_def(), &ctx);

    // Both keys default their reverse name to "posts"; only one forward
    // relation may own it.
    let result = build_model(
        ModelDef::new("Post")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::foreign_key("author", "Author"))
            .field(FieldDescriptor::foreign_key("editor", "Author")),
        &ctx,
    );
    match result {
        Err(DefinitionError::ReverseNameClash { target, name }) => {
            assert_eq!(target, "Author");
            assert_eq!(name, "posts");
        }
        other => panic!("expected ReverseNameClash, got {other:?}"),
    }

    // Distinct reverse names make the same pair of relations legal.
    let ctx = OrmContext::new();
    let author = build(author_def(), &ctx);
    build(
        ModelDef::new("Post")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::foreign_key("author", "Author").related_name("authored"))
            .field(FieldDescriptor::foreign_key("editor", "Author").related_name("edited")),
        &ctx,
    );
    assert!(author.meta.get_field("authored").is_some());
    assert!(author.meta.get_field("edited").is_some());
}

#[test]
fn inherited_constraints_follow_subclass_column_renames() {
    let ctx = OrmContext::new();
    let base = build(
        ModelDef::new("Booking")
            .meta(
                MetaDef::new()
                    .abstract_(true)
                    .constraint(UniqueColumns::new(["day", "room"])),
            )
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::text("day"))
            .field(FieldDescriptor::text("room")),
        &ctx,
    );

    // Untouched columns: the inherited constraint lands on the child table.
    let child = build(
        ModelDef::new("RoomBooking")
            .meta(MetaDef::new())
            .extends(Arc::clone(&base)),
        &ctx,
    );
    let table = child.meta.table().expect("child table populated");
    assert_eq!(table.constraints, vec![UniqueColumns::new(["day", "room"])]);

    // Redeclaring a constrained column under a new alias breaks the
    // inherited constraint.
    let result = build_model(
        ModelDef::new("HallBooking")
            .meta(MetaDef::new())
            .field(FieldDescriptor::text("day").alias("day_code"))
            .extends(base),
        &ctx,
    );
    match result {
        Err(DefinitionError::DanglingConstraint { model, columns }) => {
            assert_eq!(model, "HallBooking");
            assert_eq!(columns, vec!["day".to_string(), "room".to_string()]);
        }
        other => panic!("expected DanglingConstraint, got {other:?}"),
    }
}

#[test]
fn constraints_must_resolve_to_live_columns() {
    let ctx = OrmContext::new();

    let ok = build_model(
        ModelDef::new("Slot")
            .meta(MetaDef::new().constraint(UniqueColumns::new(["day", "room"])))
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::text("day"))
            .field(FieldDescriptor::text("room")),
        &ctx,
    );
    assert!(ok.is_ok());

    // A constraint naming a column that no field resolves to is fatal.
    let result = build_model(
        ModelDef::new("Booking")
            .meta(MetaDef::new().constraint(UniqueColumns::new(["day", "room"])))
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::text("day").alias("day_code"))
            .field(FieldDescriptor::text("room")),
        &ctx,
    );
    match result {
        Err(DefinitionError::DanglingConstraint { model, columns }) => {
            assert_eq!(model, "Booking");
            assert_eq!(columns, vec!["day".to_string(), "room".to_string()]);
        }
        other => panic!("expected DanglingConstraint, got {other:?}"),
    }
}

#[test]
fn exactly_one_primary_key_is_required() {
    let ctx = OrmContext::new();
    assert!(matches!(
        build_model(
            ModelDef::new("NoKey")
                .meta(MetaDef::new())
                .field(FieldDescriptor::text("name")),
            &ctx,
        ),
        Err(DefinitionError::MissingPrimaryKey { .. })
    ));
    assert!(matches!(
        build_model(
            ModelDef::new("TwoKeys")
                .meta(MetaDef::new())
                .field(FieldDescriptor::integer("a").primary_key(true))
                .field(FieldDescriptor::integer("b").primary_key(true)),
            &ctx,
        ),
        Err(DefinitionError::MultiplePrimaryKeys { .. })
    ));
}

#[test]
fn mixin_fields_merge_without_mutating_the_mixin() {
    let ctx = OrmContext::new();
    let mixin = Arc::new(Mixin::new(
        "Timestamped",
        Namespace::new()
            .field(FieldDescriptor::text("created_at").nullable(true))
            .field(FieldDescriptor::text("updated_at").nullable(true)),
    ));

    let first = build(
        ModelDef::new("Order")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .with_mixin(Arc::clone(&mixin)),
        &ctx,
    );
    let second = build(
        ModelDef::new("Shipment")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .with_mixin(Arc::clone(&mixin)),
        &ctx,
    );

    assert!(first.meta.get_field("created_at").is_some());
    assert!(second.meta.get_field("created_at").is_some());
    assert_eq!(mixin.namespace.attrs().len(), 2);
}

#[test]
fn relationship_edges_cover_forward_and_reverse() {
    let ctx = OrmContext::new();
    let author = build(author_def(), &ctx);
    let post = build(
        ModelDef::new("Post")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::foreign_key("author", "Author")),
        &ctx,
    );

    let forward = relationships_of(&post, &ctx);
    assert_eq!(
        forward,
        vec![Relationship::new("Post", "author", "Author", RelationshipKind::ManyToOne)]
    );

    let reverse = relationships_of(&author, &ctx);
    assert_eq!(
        reverse,
        vec![Relationship::new("Author", "posts", "Post", RelationshipKind::OneToMany)]
    );
}

#[test]
fn repeated_pairs_never_change_registered_aliases() {
    let ctx = OrmContext::new();
    build(author_def(), &ctx);
    build(
        ModelDef::new("Post")
            .meta(MetaDef::new())
            .field(FieldDescriptor::integer("id").primary_key(true))
            .field(FieldDescriptor::foreign_key("author", "Author")),
        &ctx,
    );

    let before = ctx.aliases().get("posts", "authors").expect("alias registered");
    let resolved = ctx.aliases().resolve("authors", "posts");
    assert_eq!(before, resolved);
    assert_eq!(ctx.aliases().len(), 1);
}
