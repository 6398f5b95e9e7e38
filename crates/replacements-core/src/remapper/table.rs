//! Per-category remap table.
//!
//! A [`RemapTable`] turns the configured `old=new` strings for one registry
//! category into a lookup from the old identifier to the value registered
//! under the new one.
//!
//! # Reload semantics
//!
//! Every reload starts from an empty map and re-validates each entry against
//! a fresh registry snapshot, so an entry whose target was registered late is
//! picked up on the next reload. The finished map is published with a single
//! atomic swap; readers see either the old table or the new one, never a
//! partial rebuild. Reloads of one table are serialized, so the table left
//! behind is always the one built by the last reload to start.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::error::{EntryError, EntryResult, EntrySide};
use crate::identifier::Identifier;
use crate::registry::{Registry, RegistryProvider};

/// Separator between the old and new identifier in a configuration entry.
pub const ENTRY_SEPARATOR: char = '=';

/// A validated `old=new` configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapEntry {
    /// Category the entry was validated against.
    pub category: String,
    /// Identifier persisted data may still reference.
    pub old_id: Identifier,
    /// Registered identifier to substitute.
    pub new_id: Identifier,
}

/// Counts from one [`RemapTable::reload`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadOutcome {
    /// Entries inserted, including ones that overwrote an earlier duplicate.
    pub applied: usize,
    /// Entries rejected by validation.
    pub skipped: usize,
}

/// One unresolved identifier reported by the host while loading saved data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingMapping<V> {
    /// The identifier that no longer exists.
    pub key: Identifier,
    /// The replacement chosen, if any.
    pub replacement: Option<V>,
}

impl<V> MissingMapping<V> {
    #[must_use]
    pub fn new(key: Identifier) -> Self {
        Self {
            key,
            replacement: None,
        }
    }

    #[must_use]
    pub fn is_remapped(&self) -> bool {
        self.replacement.is_some()
    }
}

/// Remap table for a single registry category.
pub struct RemapTable<V> {
    name: String,
    provider: Arc<dyn RegistryProvider<V>>,
    remap: ArcSwap<BTreeMap<Identifier, V>>,
    /// Held by a reload from its registry snapshot to its store.
    writer: Mutex<()>,
}

impl<V> std::fmt::Debug for RemapTable<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemapTable")
            .field("name", &self.name)
            .field("len", &self.remap.load().len())
            .finish_non_exhaustive()
    }
}

impl<V> RemapTable<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty table for `name`, resolving against `provider`.
    pub fn new(name: impl Into<String>, provider: Arc<dyn RegistryProvider<V>>) -> Self {
        Self {
            name: name.into(),
            provider,
            remap: ArcSwap::from_pointee(BTreeMap::new()),
            writer: Mutex::new(()),
        }
    }

    /// The category name, e.g. `items`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check a raw entry against the current registry.
    ///
    /// Has no side effects; callers decide how to report the failure.
    #[must_use]
    pub fn validate(&self, raw: &str) -> bool {
        self.check(raw).is_ok()
    }

    /// Check a raw entry against the current registry and explain any failure.
    ///
    /// # Errors
    ///
    /// Returns the first rule the entry breaks: split count, identifier
    /// syntax (old side first), then existence of the new identifier.
    pub fn check(&self, raw: &str) -> EntryResult<RemapEntry> {
        let registry = self.provider.registry();
        self.check_against(registry.as_ref(), raw)
    }

    fn check_against(&self, registry: &dyn Registry<V>, raw: &str) -> EntryResult<RemapEntry> {
        let (old_id, new_id) = parse_entry(raw)?;
        if !registry.contains_key(&new_id) {
            return Err(EntryError::UnknownTargetIdentifier { old_id, new_id });
        }
        Ok(RemapEntry {
            category: self.name.clone(),
            old_id,
            new_id,
        })
    }

    /// Rebuild the table from `raw_entries`.
    ///
    /// Invalid entries are logged and skipped; they never abort the reload.
    /// For duplicate old identifiers the last valid entry wins.
    ///
    /// Concurrent reloads of the same table run one at a time; readers are
    /// never blocked.
    pub fn reload<I, S>(&self, raw_entries: I) -> ReloadOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _writer = self.writer.lock();
        let registry = self.provider.registry();
        let mut remap = BTreeMap::new();
        let mut outcome = ReloadOutcome::default();

        for raw in raw_entries {
            let raw = raw.as_ref();
            let entry = match self.check_against(registry.as_ref(), raw) {
                Ok(entry) => entry,
                Err(e) => {
                    error!(category = %self.name, entry = raw, reason = %e, "skipping invalid replacement");
                    outcome.skipped += 1;
                    continue;
                }
            };

            // a host registry may report a key it has no value for
            let Some(value) = registry.get(&entry.new_id) else {
                error!(category = %self.name, entry = raw, "registry has key but no value");
                outcome.skipped += 1;
                continue;
            };

            if remap.insert(entry.old_id.clone(), value).is_some() {
                debug!(category = %self.name, old = %entry.old_id, "duplicate replacement overrides earlier entry");
            }
            outcome.applied += 1;
        }

        let mapped = remap.len();
        self.remap.store(Arc::new(remap));

        info!(
            category = %self.name,
            mapped,
            applied = outcome.applied,
            skipped = outcome.skipped,
            "replacements reloaded"
        );
        outcome
    }

    /// Look up the replacement for `old_id`.
    #[must_use]
    pub fn resolve(&self, old_id: &Identifier) -> Option<V> {
        self.remap.load().get(old_id).cloned()
    }

    /// Answer a batch of missing mappings, returning how many were remapped.
    pub fn remap_missing(&self, mappings: &mut [MissingMapping<V>]) -> usize {
        let remap = self.remap.load_full();
        if remap.is_empty() {
            return 0;
        }

        let mut remapped = 0;
        for mapping in mappings.iter_mut() {
            if let Some(value) = remap.get(&mapping.key) {
                debug!(category = %self.name, key = %mapping.key, "remapping missing identifier");
                mapping.replacement = Some(value.clone());
                remapped += 1;
            }
        }
        remapped
    }

    /// Every live-registry identifier in `namespace`, in registry order.
    ///
    /// Lists what exists, not what is remapped.
    #[must_use]
    pub fn dump(&self, namespace: &str) -> Vec<Identifier> {
        self.provider
            .registry()
            .keys()
            .into_iter()
            .filter(|id| id.namespace() == namespace)
            .collect()
    }

    /// Number of old identifiers currently mapped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.remap.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remap.load().is_empty()
    }

    /// Current mappings, sorted by old identifier.
    #[must_use]
    pub fn entries(&self) -> Vec<(Identifier, V)> {
        self.remap
            .load()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Split and parse `old=new` without consulting any registry.
///
/// # Errors
///
/// Returns [`EntryError::MalformedEntry`] unless there are exactly two
/// non-empty parts, or [`EntryError::InvalidIdentifierSyntax`] for the first
/// side that fails to parse.
pub fn parse_entry(raw: &str) -> EntryResult<(Identifier, Identifier)> {
    let mut parts = raw.split(ENTRY_SEPARATOR);
    let (Some(old), Some(new), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(EntryError::MalformedEntry(raw.to_string()));
    };
    if old.is_empty() || new.is_empty() {
        return Err(EntryError::MalformedEntry(raw.to_string()));
    }

    let old_id = Identifier::parse(old).map_err(|source| EntryError::InvalidIdentifierSyntax {
        side: EntrySide::Old,
        source,
    })?;
    let new_id = Identifier::parse(new).map_err(|source| EntryError::InvalidIdentifierSyntax {
        side: EntrySide::New,
        source,
    })?;
    Ok((old_id, new_id))
}
