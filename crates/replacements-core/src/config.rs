//! Configuration types for registry replacements.
//!
//! Replacements are loaded from YAML files. Each category holds a list of
//! `old_mod:old_id=new_mod:new_id` entries:
//!
//! ```yaml
//! replacements:
//!   items:
//!     - 'moda:old_item=modb:new_item'
//! logging:
//!   level: info
//! ```
//!
//! Entry syntax is not checked while parsing. Use
//! [`ReplacementsConfig::retain_valid`] to drop entries the coordinator
//! would reject.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::category::Category;
use crate::error::{ConfigError, ConfigResult};
use crate::identifier::Identifier;
use crate::registry::{InMemoryRegistry, RegistryProvider};
use crate::remapper::RemapCoordinator;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReplacementsConfig {
    /// Raw entries per category name.
    #[serde(default)]
    pub replacements: BTreeMap<String, Vec<String>>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Move lists filed under a legacy category name to the current name.
///
/// Legacy entries go first so entries under the current name win duplicates.
fn rename_legacy_categories<T>(map: &mut BTreeMap<String, Vec<T>>) {
    for (legacy, category) in Category::LEGACY_NAMES {
        let Some(mut moved) = map.remove(legacy) else {
            continue;
        };
        warn!(
            category = legacy,
            renamed_to = category.name(),
            "deprecated category name, rename it in the file"
        );
        let current = map.entry(category.name().to_string()).or_default();
        moved.append(current);
        *current = moved;
    }
}

fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

impl ReplacementsConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = read_file(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Load configuration from a YAML string.
    ///
    /// An empty document yields the default configuration. Categories under
    /// a legacy name are merged into the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(content)?;
        rename_legacy_categories(&mut config.replacements);
        Ok(config)
    }

    /// A configuration with an empty entry list for every standard category.
    #[must_use]
    pub fn template() -> Self {
        Self {
            replacements: Category::ALL
                .iter()
                .map(|c| (c.name().to_string(), Vec::new()))
                .collect(),
            logging: LoggingConfig::default(),
        }
    }

    /// Render as YAML, preceded by a comment describing the entry format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let body = serde_yaml::to_string(self)?;
        Ok(format!(
            "# IDs to remap on missing mappings, format is 'old_mod:old_id=new_mod:new_id'\n{body}"
        ))
    }

    /// Raw entries for `category`, empty if the category is not configured.
    #[must_use]
    pub fn entries(&self, category: &str) -> &[String] {
        self.replacements
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Drop every entry the coordinator's validation hook rejects.
    ///
    /// Each dropped entry is logged with its reason. Entries of categories the
    /// coordinator does not manage are all dropped. Returns how many entries
    /// were removed.
    pub fn retain_valid<V>(&mut self, coordinator: &RemapCoordinator<V>) -> usize
    where
        V: Clone + Send + Sync + 'static,
    {
        let mut dropped = 0;
        for (category, entries) in &mut self.replacements {
            let Some(table) = coordinator.table(category) else {
                if !entries.is_empty() {
                    warn!(category = %category, count = entries.len(), "dropping entries of unknown category");
                }
                dropped += entries.len();
                entries.clear();
                continue;
            };

            entries.retain(|raw| match table.check(raw) {
                Ok(_) => true,
                Err(e) => {
                    warn!(category = %category, entry = %raw, reason = %e, "dropping invalid replacement");
                    dropped += 1;
                    false
                }
            });
        }
        dropped
    }
}

/// Registry contents exported from a running host, keyed by category.
///
/// ```yaml
/// items:
///   - 'modb:new_item'
/// blocks:
///   - 'minecraft:stone'
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RegistrySnapshotFile {
    pub categories: BTreeMap<String, Vec<Identifier>>,
}

impl RegistrySnapshotFile {
    /// Load a snapshot from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, including when
    /// an identifier is malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = read_file(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Load a snapshot from a YAML string.
    ///
    /// Categories under a legacy name are merged into the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut snapshot: Self = serde_yaml::from_str(content)?;
        rename_legacy_categories(&mut snapshot.categories);
        Ok(snapshot)
    }

    /// Build a coordinator over the snapshot.
    ///
    /// Every standard category gets a table (empty if absent from the
    /// snapshot), followed by any extra categories the snapshot names. Values
    /// are the identifiers themselves.
    #[must_use]
    pub fn coordinator(&self) -> RemapCoordinator<Identifier> {
        let names = Category::ALL
            .iter()
            .map(|c| c.name().to_string())
            .chain(
                self.categories
                    .keys()
                    .filter(|name| name.parse::<Category>().is_err())
                    .cloned(),
            );

        names
            .fold(RemapCoordinator::<Identifier>::builder(), |builder, name| {
                let keys = self.categories.get(&name).cloned().unwrap_or_default();
                let provider: Arc<dyn RegistryProvider<Identifier>> =
                    Arc::new(InMemoryRegistry::from_keys(keys));
                builder.category(name, provider)
            })
            .build()
    }
}
