//! Coordinator over every category's remap table.
//!
//! The host drives the coordinator with three kinds of calls:
//!
//! - configuration changes, which reload one table (or all of them via
//!   [`RemapCoordinator::apply_config`])
//! - missing-identifier reports while loading saved data
//! - dump requests from a command surface
//!
//! The set of categories is fixed when the coordinator is built.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{info, warn, Level};

use crate::config::ReplacementsConfig;
use crate::error::{RemapError, RemapResult};
use crate::identifier::Identifier;
use crate::registry::RegistryProvider;

use super::table::{MissingMapping, ReloadOutcome, RemapTable};

/// Result of dumping one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpReport {
    pub category: String,
    pub namespace: String,
    /// Number of identifiers listed.
    pub count: usize,
    pub listing: Vec<Identifier>,
}

/// Result of dumping every category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSummary {
    pub namespace: String,
    /// Sum of all per-category counts.
    pub total: usize,
    /// Listings in coordinator order, including empty ones.
    pub per_category: IndexMap<String, Vec<Identifier>>,
}

/// Builder for [`RemapCoordinator`].
pub struct CoordinatorBuilder<V> {
    tables: IndexMap<String, RemapTable<V>>,
}

impl<V> CoordinatorBuilder<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Add a category backed by `provider`.
    ///
    /// Registering the same name twice replaces the earlier provider but
    /// keeps its position.
    #[must_use]
    pub fn category(mut self, name: impl Into<String>, provider: Arc<dyn RegistryProvider<V>>) -> Self {
        let name = name.into();
        let table = RemapTable::new(name.clone(), provider);
        if self.tables.insert(name.clone(), table).is_some() {
            warn!(category = %name, "category registered twice, keeping the last provider");
        }
        self
    }

    #[must_use]
    pub fn build(self) -> RemapCoordinator<V> {
        RemapCoordinator {
            tables: self.tables,
        }
    }
}

/// Owns one [`RemapTable`] per category.
pub struct RemapCoordinator<V> {
    tables: IndexMap<String, RemapTable<V>>,
}

impl<V> std::fmt::Debug for RemapCoordinator<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemapCoordinator")
            .field("categories", &self.tables.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<V> RemapCoordinator<V>
where
    V: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn builder() -> CoordinatorBuilder<V> {
        CoordinatorBuilder {
            tables: IndexMap::new(),
        }
    }

    /// Category names in construction order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// The table for `category`, if managed.
    #[must_use]
    pub fn table(&self, category: &str) -> Option<&RemapTable<V>> {
        self.tables.get(category)
    }

    /// Validation hook for configuration sources.
    ///
    /// Unknown categories never validate.
    #[must_use]
    pub fn validate(&self, category: &str, raw: &str) -> bool {
        self.table(category).is_some_and(|table| table.validate(raw))
    }

    /// Reload `category` from its new configuration entries.
    ///
    /// Returns `None`, after logging a warning, if the category is unknown.
    pub fn on_configuration_changed<I, S>(&self, category: &str, raw_entries: I) -> Option<ReloadOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(table) = self.table(category) else {
            warn!(category, "configuration change for unknown category ignored");
            return None;
        };
        Some(table.reload(raw_entries))
    }

    /// Reload every table from a loaded configuration.
    ///
    /// Categories missing from the configuration are reloaded empty.
    pub fn apply_config(&self, config: &ReplacementsConfig) -> ReloadOutcome {
        for category in config.replacements.keys() {
            if !self.tables.contains_key(category) {
                warn!(category = %category, "configuration names an unknown category");
            }
        }

        self.tables
            .values()
            .map(|table| table.reload(config.entries(table.name())))
            .fold(ReloadOutcome::default(), |acc, outcome| ReloadOutcome {
                applied: acc.applied + outcome.applied,
                skipped: acc.skipped + outcome.skipped,
            })
    }

    /// Replacement for a missing identifier, if one is configured.
    #[must_use]
    pub fn on_missing_identifier(&self, category: &str, old_id: &Identifier) -> Option<V> {
        self.table(category)?.resolve(old_id)
    }

    /// Answer a batch of missing identifiers for one category.
    ///
    /// Returns how many were remapped; zero for unknown categories.
    pub fn on_missing_mappings(&self, category: &str, mappings: &mut [MissingMapping<V>]) -> usize {
        self.table(category)
            .map_or(0, |table| table.remap_missing(mappings))
    }

    /// List the live-registry identifiers of `category` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`RemapError::UnknownCategory`] if the category is not managed.
    pub fn dump_category(&self, category: &str, namespace: &str) -> RemapResult<DumpReport> {
        let table = self
            .table(category)
            .ok_or_else(|| RemapError::UnknownCategory(category.to_string()))?;
        Ok(Self::dump_table(table, namespace))
    }

    /// Dump every category for `namespace`.
    #[must_use]
    pub fn dump_all(&self, namespace: &str) -> DumpSummary {
        let mut total = 0;
        let mut per_category = IndexMap::with_capacity(self.tables.len());
        for table in self.tables.values() {
            let report = Self::dump_table(table, namespace);
            total += report.count;
            per_category.insert(report.category, report.listing);
        }

        info!(namespace, total, "dumped all registries");
        DumpSummary {
            namespace: namespace.to_string(),
            total,
            per_category,
        }
    }

    fn dump_table(table: &RemapTable<V>, namespace: &str) -> DumpReport {
        let listing = table.dump(namespace);
        if tracing::enabled!(Level::INFO) {
            let rendered = listing
                .iter()
                .map(Identifier::as_str)
                .collect::<Vec<_>>()
                .join("\n");
            info!(
                category = table.name(),
                namespace,
                count = listing.len(),
                "mod dump for registry:\n{rendered}"
            );
        }

        DumpReport {
            category: table.name().to_string(),
            namespace: namespace.to_string(),
            count: listing.len(),
            listing,
        }
    }
}
