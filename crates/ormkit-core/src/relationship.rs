//! Relationship metadata.
//!
//! A `Relationship` is a directed edge between two models, derived from a
//! relation field during relationship expansion. Higher layers (the query
//! builder) consume these edges together with the alias registry to join
//! tables without runtime reflection.

use serde::Serialize;

/// The cardinality of a relationship between two models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RelationshipKind {
    /// Many `Post`s belong to one `Author` (forward foreign key).
    #[default]
    ManyToOne,
    /// One `Author` has many `Post`s (reverse of a foreign key).
    OneToMany,
    /// `Post`s have many `Category`s via an association table.
    ManyToMany,
}

impl RelationshipKind {
    /// The kind of the auto-created reverse edge.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            RelationshipKind::ManyToOne => RelationshipKind::OneToMany,
            RelationshipKind::OneToMany => RelationshipKind::ManyToOne,
            RelationshipKind::ManyToMany => RelationshipKind::ManyToMany,
        }
    }
}

/// A directed relationship edge between two models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    /// Owning model name.
    pub owner: String,
    /// Name of the relation field on the owner.
    pub field: String,
    /// Target model name.
    pub target: String,
    /// Cardinality.
    pub kind: RelationshipKind,
    /// Association table name (many-to-many only).
    pub through_table: Option<String>,
}

impl Relationship {
    /// Create a new relationship edge.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        field: impl Into<String>,
        target: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
            target: target.into(),
            kind,
            through_table: None,
        }
    }

    /// Set the association table name (many-to-many).
    #[must_use]
    pub fn through_table(mut self, table: impl Into<String>) -> Self {
        self.through_table = Some(table.into());
        self
    }
}
