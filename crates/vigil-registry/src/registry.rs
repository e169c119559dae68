//! The schema registry: a read-mostly cache of compiled schemas.
//!
//! The registry holds an immutable snapshot, `Arc<HashMap<name, entry>>`,
//! behind a `parking_lot::RwLock`. Readers clone the `Arc` under a brief read
//! lock and then work lock-free on a snapshot that can never change under
//! them. Writers fetch and compile outside the lock, then swap in a complete
//! replacement map, so a reader sees either the old schema or the new one,
//! never a half-updated mix. Writers serialize on a separate refresh mutex
//! held from fetch to swap, so a slow `refresh_all` cannot overwrite a newer
//! `refresh_schema` result.
//!
//! Lifecycle:
//!
//! 1. `load` bulk-fetches every schema from the `SchemaSource`.
//! 2. `refresh_schema(name)` re-fetches one schema; a miss evicts it.
//! 3. `refresh_all()` re-fetches everything and replaces the whole snapshot.

use std::{collections::HashMap, sync::Arc};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use vigil_contracts::{error::VigilResult, rule::Rule, schema::Schema};
use vigil_core::{RuleSet, SchemaProvider, SchemaSource};

/// A cached schema together with its compiled rules.
#[derive(Debug, Clone)]
pub struct RegisteredSchema {
    pub schema: Arc<Schema>,
    pub rules: Arc<RuleSet>,
}

impl RegisteredSchema {
    pub fn compile(schema: Schema) -> Self {
        let rules = Arc::new(RuleSet::from_schema(&schema));
        Self {
            schema: Arc::new(schema),
            rules,
        }
    }
}

type Snapshot = Arc<HashMap<String, RegisteredSchema>>;

/// Process-wide schema cache. Construct once and share as `Arc<SchemaRegistry>`.
pub struct SchemaRegistry {
    source: Box<dyn SchemaSource>,
    snapshot: RwLock<Snapshot>,
    refresh: Mutex<()>,
}

impl SchemaRegistry {
    /// Create an empty registry over `source` without fetching anything.
    pub fn new(source: impl SchemaSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            snapshot: RwLock::new(Arc::new(HashMap::new())),
            refresh: Mutex::new(()),
        }
    }

    /// Create a registry and populate it from `source`.
    ///
    /// Returns the source's error if the initial bulk fetch fails.
    pub fn load(source: impl SchemaSource + 'static) -> VigilResult<Self> {
        let registry = Self::new(source);
        registry.refresh_all()?;
        Ok(registry)
    }

    /// Re-fetch every schema and replace the whole cache.
    ///
    /// On error the current snapshot is left untouched. Returns the number of
    /// schemas now cached.
    pub fn refresh_all(&self) -> VigilResult<usize> {
        let _writer = self.refresh.lock();
        let schemas = self.source.fetch_all()?;
        let mut next = HashMap::with_capacity(schemas.len());
        for schema in schemas {
            let name = schema.schema_name.clone();
            if next.insert(name.clone(), RegisteredSchema::compile(schema)).is_some() {
                warn!(schema = %name, "duplicate schema name; keeping the last definition");
            }
        }
        let count = next.len();
        *self.snapshot.write() = Arc::new(next);
        info!(schemas = count, "schema registry loaded");
        Ok(count)
    }

    /// Re-fetch one schema by name.
    ///
    /// Returns `true` when the schema was found and replaced, `false` when the
    /// source no longer has it (it is evicted from the cache).
    pub fn refresh_schema(&self, name: &str) -> VigilResult<bool> {
        let _writer = self.refresh.lock();
        let fetched = self.source.fetch_by_name(name)?.map(RegisteredSchema::compile);

        let mut guard = self.snapshot.write();
        let mut next: HashMap<String, RegisteredSchema> = (**guard).clone();
        let found = match fetched {
            Some(entry) => {
                next.insert(name.to_string(), entry);
                info!(schema = %name, "schema refreshed");
                true
            }
            None => {
                if next.remove(name).is_some() {
                    warn!(schema = %name, "schema no longer in source; evicted");
                } else {
                    debug!(schema = %name, "refresh of unknown schema found nothing");
                }
                false
            }
        };
        *guard = Arc::new(next);
        Ok(found)
    }

    /// The current snapshot. Cheap: one `Arc` clone under a read lock.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.snapshot.read())
    }

    pub fn get(&self, name: &str) -> Option<RegisteredSchema> {
        self.snapshot().get(name).cloned()
    }

    /// The cached schema, `None` for unknown names.
    pub fn get_schema(&self, name: &str) -> Option<Arc<Schema>> {
        self.get(name).map(|entry| entry.schema)
    }

    /// The rule for `field` in schema `name`, `None` when either is unknown.
    pub fn get_rule(&self, name: &str, field: &str) -> Option<Rule> {
        self.get_schema(name)?.rule(field).cloned()
    }

    /// Cached schema names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshot().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl SchemaProvider for SchemaRegistry {
    fn rule_set(&self, schema_name: &str) -> Option<Arc<RuleSet>> {
        self.get(schema_name).map(|entry| entry.rules)
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.names())
            .finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
