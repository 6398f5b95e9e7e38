//! Test harness for exercising the remap coordinator.
//!
//! Provides:
//! - One mutable registry per category
//! - A coordinator wired to those registries
//! - Helpers that take identifiers as strings

use std::sync::Arc;

use indexmap::IndexMap;

use crate::identifier::Identifier;
use crate::registry::{RegistryProvider, SharedRegistry};
use crate::remapper::RemapCoordinator;

/// Coordinator plus handles to the registries behind it.
pub struct RemapTestHarness<V> {
    /// The coordinator under test.
    pub coordinator: RemapCoordinator<V>,
    registries: IndexMap<String, Arc<SharedRegistry<V>>>,
}

impl<V> RemapTestHarness<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Register `value` under `id` in `category`'s live registry.
    ///
    /// # Panics
    ///
    /// Panics if the category was not declared or `id` does not parse.
    pub fn register(&self, category: &str, id: &str, value: V) {
        self.registry(category).register(parse(id), value);
    }

    /// Remove `id` from `category`'s live registry.
    ///
    /// # Panics
    ///
    /// Panics if the category was not declared or `id` does not parse.
    pub fn unregister(&self, category: &str, id: &str) {
        self.registry(category).unregister(&parse(id));
    }

    /// The live registry behind `category`.
    ///
    /// # Panics
    ///
    /// Panics if the category was not declared.
    #[must_use]
    pub fn registry(&self, category: &str) -> &Arc<SharedRegistry<V>> {
        self.registries
            .get(category)
            .unwrap_or_else(|| panic!("category {category} not declared in harness"))
    }

    /// Shorthand for [`RemapCoordinator::on_missing_identifier`].
    ///
    /// # Panics
    ///
    /// Panics if `old_id` does not parse.
    #[must_use]
    pub fn resolve(&self, category: &str, old_id: &str) -> Option<V> {
        self.coordinator
            .on_missing_identifier(category, &parse(old_id))
    }
}

fn parse(id: &str) -> Identifier {
    Identifier::parse(id).unwrap_or_else(|e| panic!("bad test identifier {id}: {e}"))
}

/// Builder for [`RemapTestHarness`].
pub struct TestHarnessBuilder<V> {
    registries: IndexMap<String, Arc<SharedRegistry<V>>>,
}

impl<V> Default for TestHarnessBuilder<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TestHarnessBuilder<V>
where
    V: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            registries: IndexMap::new(),
        }
    }

    /// Declare a category with an empty registry.
    #[must_use]
    pub fn category(mut self, name: &str) -> Self {
        self.registries
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(SharedRegistry::new()));
        self
    }

    /// Pre-register an entry, declaring the category if needed.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not parse.
    #[must_use]
    pub fn register(self, category: &str, id: &str, value: V) -> Self {
        let this = self.category(category);
        this.registries[category].register(parse(id), value);
        this
    }

    #[must_use]
    pub fn build(self) -> RemapTestHarness<V> {
        let coordinator = self
            .registries
            .iter()
            .fold(RemapCoordinator::<V>::builder(), |builder, (name, registry)| {
                let provider: Arc<dyn RegistryProvider<V>> = registry.clone();
                builder.category(name.as_str(), provider)
            })
            .build();

        RemapTestHarness {
            coordinator,
            registries: self.registries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_late_registration() {
        let harness = TestHarnessBuilder::<u32>::new().category("blocks").build();
        harness
            .coordinator
            .on_configuration_changed("blocks", ["moda:old=modc:late"]);
        assert_eq!(harness.resolve("blocks", "moda:old"), None);

        harness.register("blocks", "modc:late", 9u32);
        harness
            .coordinator
            .on_configuration_changed("blocks", ["moda:old=modc:late"]);
        assert_eq!(harness.resolve("blocks", "moda:old"), Some(9));
    }

    #[test]
    fn test_harness_category_order() {
        let harness = TestHarnessBuilder::<()>::new()
            .category("items")
            .category("blocks")
            .category("items")
            .build();
        let names: Vec<&str> = harness.coordinator.categories().collect();
        assert_eq!(names, vec!["items", "blocks"]);
    }

    #[test]
    #[should_panic(expected = "not declared")]
    fn test_harness_unknown_category_panics() {
        let harness = TestHarnessBuilder::<()>::new().build();
        harness.register("items", "moda:x", ());
    }
}
