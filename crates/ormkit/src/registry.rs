//! Shared construction context: model registry, table metadata container,
//! alias registry, and the mixin extraction cache.
//!
//! One `OrmContext` is created at program initialization and passed into
//! every builder invocation. Model declarations run sequentially at
//! startup; the query layer reads the same context concurrently once
//! traffic begins, so every write here is a single guarded map insertion —
//! a reader never observes a half-registered table or alias.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::extract::ExtractedNamespace;
use crate::schema::{Model, TableSchema};

/// Process-wide registry of join aliases.
///
/// Maps an unordered pair of table names to a short unique alias used by
/// the query layer to disambiguate joined-table columns. Grows
/// monotonically; an entry, once written, is never overwritten.
#[derive(Debug, Default)]
pub struct AliasRegistry {
    entries: RwLock<BTreeMap<(String, String), String>>,
}

/// FNV-1a, used to derive aliases deterministically from table pairs.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl AliasRegistry {
    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    /// Return the alias for a table pair, generating and recording one if
    /// the pair is new. Existing entries are returned unchanged.
    pub fn resolve(&self, a: &str, b: &str) -> String {
        let key = Self::key(a, b);
        {
            let entries = self.entries.read().expect("alias registry lock poisoned");
            if let Some(alias) = entries.get(&key) {
                return alias.clone();
            }
        }

        let mut entries = self.entries.write().expect("alias registry lock poisoned");
        // Re-check under the write lock.
        if let Some(alias) = entries.get(&key) {
            return alias.clone();
        }

        let seed = format!("{}|{}", key.0, key.1);
        let mut bump = 0u64;
        let alias = loop {
            let hash = fnv1a(seed.as_bytes()).wrapping_add(bump);
            let candidate = format!("{:08x}_", hash & 0xffff_ffff);
            if !entries.values().any(|existing| existing == &candidate) {
                break candidate;
            }
            bump += 1;
        };
        tracing::debug!(left = %key.0, right = %key.1, alias = %alias, "Registered join alias");
        entries.insert(key, alias.clone());
        alias
    }

    /// Look up the alias for a table pair without creating one.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<String> {
        self.entries
            .read()
            .expect("alias registry lock poisoned")
            .get(&Self::key(a, b))
            .cloned()
    }

    /// Number of registered pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().expect("alias registry lock poisoned").len()
    }

    /// True when no pair has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared construction context, passed into every builder invocation.
#[derive(Debug, Default)]
pub struct OrmContext {
    models: RwLock<BTreeMap<String, Arc<Model>>>,
    metadata: RwLock<BTreeMap<String, Arc<TableSchema>>>,
    aliases: AliasRegistry,
    parsed: RwLock<BTreeMap<String, ExtractedNamespace>>,
}

impl OrmContext {
    /// Create a fresh context.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The alias registry.
    #[must_use]
    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Register a constructed model under its name.
    pub(crate) fn register_model(&self, model: Arc<Model>) {
        tracing::debug!(model = %model.name, "Registered model");
        self.models
            .write()
            .expect("model registry lock poisoned")
            .insert(model.name.clone(), model);
    }

    /// Look up a model by name.
    #[must_use]
    pub fn get_model(&self, name: &str) -> Option<Arc<Model>> {
        self.models
            .read()
            .expect("model registry lock poisoned")
            .get(name)
            .cloned()
    }

    /// Register a table schema iff its name is not already present.
    /// Returns whether the table was inserted.
    pub(crate) fn register_table_if_absent(&self, table: Arc<TableSchema>) -> bool {
        let mut metadata = self.metadata.write().expect("metadata lock poisoned");
        if metadata.contains_key(&table.name) {
            return false;
        }
        tracing::debug!(table = %table.name, "Registered table");
        metadata.insert(table.name.clone(), table);
        true
    }

    /// Replace a table registration with a repopulated schema. A single
    /// insertion: readers see the old or the new complete schema.
    pub(crate) fn replace_table(&self, table: Arc<TableSchema>) {
        self.metadata
            .write()
            .expect("metadata lock poisoned")
            .insert(table.name.clone(), table);
    }

    /// Remove a table registration (used when a superseded association
    /// table is retired). Returns whether an entry was removed.
    pub(crate) fn remove_table(&self, name: &str) -> bool {
        self.metadata
            .write()
            .expect("metadata lock poisoned")
            .remove(name)
            .is_some()
    }

    /// Look up a registered table schema by name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<Arc<TableSchema>> {
        self.metadata
            .read()
            .expect("metadata lock poisoned")
            .get(name)
            .cloned()
    }

    /// Names of all registered tables.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.metadata
            .read()
            .expect("metadata lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Cached extraction for a mixin, if it was merged before.
    pub(crate) fn get_parsed(&self, mixin: &str) -> Option<ExtractedNamespace> {
        self.parsed
            .read()
            .expect("parsed cache lock poisoned")
            .get(mixin)
            .cloned()
    }

    /// Record a mixin extraction. Written at most once per mixin; later
    /// calls for the same key are ignored.
    pub(crate) fn store_parsed(&self, mixin: &str, extracted: ExtractedNamespace) {
        let mut parsed = self.parsed.write().expect("parsed cache lock poisoned");
        parsed.entry(mixin.to_string()).or_insert(extracted);
    }
}
