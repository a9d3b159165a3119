//! Annotation/default extraction.
//!
//! Splits a model namespace into the two views the rest of the pipeline
//! works with: the record-layer field list (every annotated attribute,
//! whether or not it carries a descriptor) and the descriptor map (only
//! attributes declared through `FieldDescriptor`). Exact name-to-attribute
//! correspondence is preserved; the split itself is pure.

use std::collections::BTreeSet;

use ormkit_core::FieldDescriptor;

use crate::namespace::{Attribute, Namespace};
use crate::record::RecordField;

/// The two views extracted from a namespace, plus property-field names.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExtractedNamespace {
    /// Record-layer view: one entry per annotated attribute.
    pub record_fields: Vec<RecordField>,
    /// Descriptor view, in declaration order. Names are unique.
    pub fields: Vec<FieldDescriptor>,
    /// Computed property names.
    pub properties: BTreeSet<String>,
}

/// Split a namespace into record fields and field descriptors.
pub(crate) fn split_namespace(ns: &Namespace) -> ExtractedNamespace {
    let mut out = ExtractedNamespace::default();
    for (name, attr) in ns.attrs() {
        match attr {
            Attribute::Field(field) => {
                out.record_fields.push(RecordField {
                    name: name.clone(),
                    sql_type: field.sql_type.clone(),
                    nullable: field.nullable,
                    default: field.default.clone(),
                });
                out.fields.push(field.clone());
            }
            Attribute::Annotation { sql_type, nullable } => {
                out.record_fields.push(RecordField {
                    name: name.clone(),
                    sql_type: sql_type.clone(),
                    nullable: *nullable,
                    default: None,
                });
            }
            Attribute::Property => {
                out.properties.insert(name.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormkit_core::SqlType;

    #[test]
    fn test_split_separates_views() {
        let ns = Namespace::new()
            .field(FieldDescriptor::integer("id").primary_key(true))
            .annotation("note", SqlType::Text, true)
            .property("label");

        let extracted = split_namespace(&ns);
        assert_eq!(extracted.record_fields.len(), 2);
        assert_eq!(extracted.fields.len(), 1);
        assert_eq!(extracted.fields[0].name, "id");
        assert!(extracted.properties.contains("label"));
    }

    #[test]
    fn test_split_is_pure() {
        let ns = Namespace::new().field(FieldDescriptor::text("name"));
        let first = split_namespace(&ns);
        let second = split_namespace(&ns);
        assert_eq!(first.fields.len(), second.fields.len());
        assert_eq!(first.record_fields.len(), second.record_fields.len());
    }
}
