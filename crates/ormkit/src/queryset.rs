//! Query entry point attached to every concrete model.
//!
//! The query-building API itself lives outside this crate; `QuerySet` is
//! the handle the pipeline attaches exactly once per concrete model, after
//! relationship expansion completes. It carries what the query layer needs
//! to start: the model's table and the shared context with the alias
//! registry.

use std::sync::Arc;

use crate::registry::OrmContext;

/// Per-model query entry point.
#[derive(Clone)]
pub struct QuerySet {
    model_name: String,
    tablename: String,
    ctx: Arc<OrmContext>,
}

impl QuerySet {
    pub(crate) fn new(model_name: String, tablename: String, ctx: Arc<OrmContext>) -> Self {
        Self {
            model_name,
            tablename,
            ctx,
        }
    }

    /// The owning model's name.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// The owning model's table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.tablename
    }

    /// The join alias registered for this model's table and a related
    /// table, if the pair was registered during relationship expansion.
    #[must_use]
    pub fn table_prefix(&self, related_table: &str) -> Option<String> {
        self.ctx.aliases().get(&self.tablename, related_table)
    }
}

impl std::fmt::Debug for QuerySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySet")
            .field("model_name", &self.model_name)
            .field("tablename", &self.tablename)
            .finish()
    }
}
