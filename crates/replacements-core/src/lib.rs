//! Registry Replacements Core Library
//!
//! When saved world data references a registry identifier that no longer
//! exists because a mod renamed or removed it, this library substitutes a
//! configured replacement so the data is not lost.
//!
//! # Architecture
//!
//! - [`identifier`] - Namespaced `namespace:path` identifiers
//! - [`registry`] - Live registry traits and in-memory implementations
//! - [`remapper`] - Per-category remap tables and their coordinator
//! - [`config`] - YAML configuration and registry snapshot files
//! - [`category`] - The standard registry categories
//! - [`error`] - Domain-specific error types
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use replacements_core::{Identifier, InMemoryRegistry, RemapCoordinator};
//!
//! let items = InMemoryRegistry::new().with(Identifier::parse("modb:new_item").unwrap(), 7u32);
//! let coordinator = RemapCoordinator::<u32>::builder()
//!     .category("items", Arc::new(items))
//!     .build();
//!
//! coordinator.on_configuration_changed("items", ["moda:old_item=modb:new_item"]);
//!
//! let old = Identifier::parse("moda:old_item").unwrap();
//! assert_eq!(coordinator.on_missing_identifier("items", &old), Some(7));
//! ```

#![forbid(unsafe_code)]

pub mod category;
pub mod config;
pub mod error;
pub mod identifier;
pub mod registry;
pub mod remapper;

/// Test utilities: a coordinator over mutable registries.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types
pub use category::Category;
pub use config::{LoggingConfig, RegistrySnapshotFile, ReplacementsConfig};
pub use error::{ConfigError, EntryError, EntrySide, IdentifierError, RemapError};
pub use identifier::Identifier;
pub use registry::{InMemoryRegistry, Registry, RegistryProvider, SharedRegistry};
pub use remapper::{
    DumpReport, DumpSummary, MissingMapping, ReloadOutcome, RemapCoordinator, RemapEntry, RemapTable,
};
