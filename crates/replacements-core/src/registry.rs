//! Live registry abstraction.
//!
//! A [`RegistryProvider`] hands out the current contents of one registry
//! category as an immutable [`Registry`] snapshot. Remap tables ask for a
//! fresh snapshot on every reload or dump because the host keeps registering
//! entries over its lifecycle.
//!
//! Two implementations are bundled:
//!
//! - [`InMemoryRegistry`] - a fixed, insertion-ordered registry
//! - [`SharedRegistry`] - a mutable registry that publishes a new snapshot on
//!   every registration, for hosts (and tests) whose mods register late

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;

use crate::identifier::Identifier;

/// Read access to one registry category.
pub trait Registry<V>: Send + Sync {
    /// Check whether `id` is registered.
    fn contains_key(&self, id: &Identifier) -> bool;

    /// Get the value registered under `id`.
    fn get(&self, id: &Identifier) -> Option<V>;

    /// Every registered identifier, in registration order.
    fn keys(&self) -> Vec<Identifier>;
}

/// Source of live registry snapshots for one category.
pub trait RegistryProvider<V>: Send + Sync {
    /// The registry as it is right now.
    fn registry(&self) -> Arc<dyn Registry<V>>;
}

impl<V, F> RegistryProvider<V> for F
where
    F: Fn() -> Arc<dyn Registry<V>> + Send + Sync,
{
    fn registry(&self) -> Arc<dyn Registry<V>> {
        self()
    }
}

/// Insertion-ordered registry held entirely in memory.
///
/// Clones share storage until one of them is modified, so handing out
/// snapshots is cheap.
#[derive(Debug, Clone)]
pub struct InMemoryRegistry<V> {
    entries: Arc<IndexMap<Identifier, V>>,
}

impl<V> Default for InMemoryRegistry<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(IndexMap::new()),
        }
    }
}

impl<V> InMemoryRegistry<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> InMemoryRegistry<V> {
    /// Register `value` under `id`, replacing any previous value in place.
    pub fn insert(&mut self, id: Identifier, value: V) -> Option<V> {
        Arc::make_mut(&mut self.entries).insert(id, value)
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, id: Identifier, value: V) -> Self {
        self.insert(id, value);
        self
    }

    /// Remove `id`, keeping the order of the remaining entries.
    pub fn remove(&mut self, id: &Identifier) -> Option<V> {
        Arc::make_mut(&mut self.entries).shift_remove(id)
    }
}

impl InMemoryRegistry<Identifier> {
    /// Build a registry whose values are the identifiers themselves.
    ///
    /// This is what offline tooling uses, where only the key set is known.
    #[must_use]
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = Identifier>,
    {
        Self {
            entries: Arc::new(keys.into_iter().map(|id| (id.clone(), id)).collect()),
        }
    }
}

impl<V> FromIterator<(Identifier, V)> for InMemoryRegistry<V> {
    fn from_iter<T: IntoIterator<Item = (Identifier, V)>>(iter: T) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<V> Registry<V> for InMemoryRegistry<V>
where
    V: Clone + Send + Sync,
{
    fn contains_key(&self, id: &Identifier) -> bool {
        self.entries.contains_key(id)
    }

    fn get(&self, id: &Identifier) -> Option<V> {
        self.entries.get(id).cloned()
    }

    fn keys(&self) -> Vec<Identifier> {
        self.entries.keys().cloned().collect()
    }
}

impl<V> RegistryProvider<V> for InMemoryRegistry<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn registry(&self) -> Arc<dyn Registry<V>> {
        Arc::new(self.clone())
    }
}

/// Mutable registry that publishes immutable snapshots.
///
/// Registration copies the current snapshot, applies the change and swaps it
/// in, so snapshots already handed out are never affected.
pub struct SharedRegistry<V> {
    snap: ArcSwap<InMemoryRegistry<V>>,
}

impl<V> Default for SharedRegistry<V> {
    fn default() -> Self {
        Self {
            snap: ArcSwap::from_pointee(InMemoryRegistry::default()),
        }
    }
}

impl<V> std::fmt::Debug for SharedRegistry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("len", &self.snap.load().len())
            .finish()
    }
}

impl<V> SharedRegistry<V>
where
    V: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_registry(registry: InMemoryRegistry<V>) -> Self {
        Self {
            snap: ArcSwap::from_pointee(registry),
        }
    }

    /// Register a single entry.
    pub fn register(&self, id: Identifier, value: V) {
        self.register_many([(id, value)]);
    }

    /// Register several entries in one snapshot swap.
    pub fn register_many<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (Identifier, V)>,
    {
        let entries: Vec<(Identifier, V)> = entries.into_iter().collect();
        if entries.is_empty() {
            return;
        }
        self.snap.rcu(|current| {
            let mut next = InMemoryRegistry::clone(current);
            for (id, value) in entries.iter().cloned() {
                next.insert(id, value);
            }
            next
        });
    }

    /// Remove an entry, as happens when a mod is uninstalled.
    pub fn unregister(&self, id: &Identifier) {
        self.snap.rcu(|current| {
            let mut next = InMemoryRegistry::clone(current);
            next.remove(id);
            next
        });
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<InMemoryRegistry<V>> {
        self.snap.load_full()
    }
}

impl<V> RegistryProvider<V> for SharedRegistry<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn registry(&self) -> Arc<dyn Registry<V>> {
        self.snap.load_full()
    }
}
