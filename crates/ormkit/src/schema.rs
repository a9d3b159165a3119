//! Derived model metadata: the schema side of a constructed model.
//!
//! `Meta` is the per-model metadata object the construction pipeline
//! populates: table name, merged field descriptors, constraints, property
//! fields, and (for concrete models) the canonical `TableSchema`. The
//! table slot is a typed state: `None` until the Schema Populator runs,
//! then an `Arc` snapshot that is swapped atomically when an association
//! table is repopulated with its foreign keys.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde_json::Value;

use ormkit_core::{FieldDescriptor, SignalEmitter, SqlType};

use crate::queryset::QuerySet;
use crate::record::RecordType;

/// A table-level uniqueness constraint over a set of column aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueColumns(pub Vec<String>);

impl UniqueColumns {
    /// Create a constraint over the given columns.
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    /// The constrained column aliases.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.0
    }
}

/// A single derived column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnDef {
    /// Column name (the field's alias).
    pub name: String,
    /// SQL type.
    pub sql_type: SqlType,
    /// Whether this column is nullable.
    pub nullable: bool,
    /// Whether this is the primary key column.
    pub primary_key: bool,
    /// Whether this column auto-increments.
    pub auto_increment: bool,
    /// Whether this column carries a single-column unique constraint.
    pub unique: bool,
    /// Default value, if any.
    pub default: Option<Value>,
    /// Referenced table for foreign key columns (`table.column`).
    pub foreign_key: Option<String>,
}

/// The canonical relational schema derived from a model's merged fields.
#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Columns in field-declaration order.
    pub columns: Vec<ColumnDef>,
    /// Name of the primary key field.
    pub pkname: String,
    /// Table-level uniqueness constraints.
    pub constraints: Vec<UniqueColumns>,
}

impl TableSchema {
    /// Column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Per-model schema metadata.
pub struct Meta {
    /// Name of the owning model.
    pub model_name: String,
    /// Resolved table name (set even for abstract models, unused there).
    pub tablename: String,
    /// Abstract models get no table and serve only as bases.
    pub abstract_: bool,
    /// Database connection identifier.
    pub database: Option<String>,
    /// Table-level uniqueness constraints (own plus inherited).
    pub constraints: Vec<UniqueColumns>,
    /// Names of computed property fields exposed in record dumps.
    pub property_fields: BTreeSet<String>,
    /// Merged field descriptors. Reverse relation fields are appended here
    /// by relationship expansion after the owning model is constructed.
    fields: RwLock<Vec<FieldDescriptor>>,
    /// Populated table schema; `None` until the Schema Populator runs.
    table: RwLock<Option<Arc<TableSchema>>>,
}

impl Meta {
    pub(crate) fn new(
        model_name: String,
        tablename: String,
        abstract_: bool,
        database: Option<String>,
        constraints: Vec<UniqueColumns>,
        property_fields: BTreeSet<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            model_name,
            tablename,
            abstract_,
            database,
            constraints,
            property_fields,
            fields: RwLock::new(fields),
            table: RwLock::new(None),
        }
    }

    /// Snapshot of the current field descriptors.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields.read().expect("model fields lock poisoned").clone()
    }

    /// Names of the current field descriptors, in order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields
            .read()
            .expect("model fields lock poisoned")
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }

    /// Look up a field descriptor by name.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<FieldDescriptor> {
        self.fields
            .read()
            .expect("model fields lock poisoned")
            .iter()
            .find(|f| f.name == name)
            .cloned()
    }

    /// Append a field descriptor. A single push, so a concurrent reader
    /// sees either the old or the new complete set.
    pub(crate) fn add_field(&self, field: FieldDescriptor) {
        self.fields
            .write()
            .expect("model fields lock poisoned")
            .push(field);
    }

    /// The populated table schema, if the Schema Populator has run.
    #[must_use]
    pub fn table(&self) -> Option<Arc<TableSchema>> {
        self.table.read().expect("table slot lock poisoned").clone()
    }

    /// Publish the table schema as a single atomic swap.
    pub(crate) fn set_table(&self, table: Arc<TableSchema>) {
        *self.table.write().expect("table slot lock poisoned") = Some(table);
    }

    /// The populated primary key field name, if any.
    #[must_use]
    pub fn pkname(&self) -> Option<String> {
        self.table().map(|t| t.pkname.clone())
    }
}

impl std::fmt::Debug for Meta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Meta")
            .field("model_name", &self.model_name)
            .field("tablename", &self.tablename)
            .field("abstract_", &self.abstract_)
            .field("fields", &self.field_names())
            .field("populated", &self.table().is_some())
            .finish()
    }
}

/// A fully constructed model: validation record type plus schema metadata.
pub struct Model {
    /// Model name.
    pub name: String,
    /// Schema metadata.
    pub meta: Meta,
    /// The validated-record type built by the record layer.
    record: RwLock<RecordType>,
    /// Per-model signal hooks.
    signals: RwLock<SignalEmitter>,
    /// Query entry point, attached exactly once for concrete models.
    queryset: std::sync::OnceLock<QuerySet>,
}

impl Model {
    pub(crate) fn new(meta: Meta, record: RecordType, signals: SignalEmitter) -> Self {
        Self {
            name: meta.model_name.clone(),
            meta,
            record: RwLock::new(record),
            signals: RwLock::new(signals),
            queryset: std::sync::OnceLock::new(),
        }
    }

    /// Read access to the record type.
    #[must_use]
    pub fn record(&self) -> RwLockReadGuard<'_, RecordType> {
        self.record.read().expect("record lock poisoned")
    }

    pub(crate) fn record_mut(&self) -> RwLockWriteGuard<'_, RecordType> {
        self.record.write().expect("record lock poisoned")
    }

    /// Read access to the signal emitter.
    #[must_use]
    pub fn signals(&self) -> RwLockReadGuard<'_, SignalEmitter> {
        self.signals.read().expect("signals lock poisoned")
    }

    /// Write access to the signal emitter, for connecting receivers.
    #[must_use]
    pub fn signals_mut(&self) -> RwLockWriteGuard<'_, SignalEmitter> {
        self.signals.write().expect("signals lock poisoned")
    }

    /// The query entry point. `None` for abstract models.
    #[must_use]
    pub fn objects(&self) -> Option<&QuerySet> {
        self.queryset.get()
    }

    pub(crate) fn attach_queryset(&self, queryset: QuerySet) {
        // Exactly-once: a second attach attempt is ignored.
        let _ = self.queryset.set(queryset);
    }

    /// All relation fields (forward and reverse) currently on the model.
    #[must_use]
    pub fn relation_fields(&self) -> Vec<FieldDescriptor> {
        self.meta
            .fields()
            .into_iter()
            .filter(FieldDescriptor::is_relation)
            .collect()
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("meta", &self.meta)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_columns_new() {
        let constraint = UniqueColumns::new(["a", "b"]);
        assert_eq!(constraint.columns(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_table_schema_lookup() {
        let table = TableSchema {
            name: "items".to_string(),
            columns: vec![ColumnDef {
                name: "id".to_string(),
                sql_type: SqlType::Integer,
                nullable: false,
                primary_key: true,
                auto_increment: false,
                unique: false,
                default: None,
                foreign_key: None,
            }],
            pkname: "id".to_string(),
            constraints: Vec::new(),
        };
        assert_eq!(table.column_names(), vec!["id"]);
        assert!(table.get_column("id").is_some());
        assert!(table.get_column("missing").is_none());
    }

    #[test]
    fn test_meta_table_slot_starts_unpopulated() {
        let meta = Meta::new(
            "Item".to_string(),
            "items".to_string(),
            false,
            None,
            Vec::new(),
            BTreeSet::new(),
            vec![FieldDescriptor::integer("id").primary_key(true)],
        );
        assert!(meta.table().is_none());
        assert!(meta.pkname().is_none());
        assert_eq!(meta.field_names(), vec!["id"]);
    }
}
