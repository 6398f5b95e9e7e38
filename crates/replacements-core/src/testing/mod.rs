//! Test utilities for registry replacements.
//!
//! - [`RemapTestHarness`] - A coordinator whose categories are backed by
//!   [`SharedRegistry`](crate::registry::SharedRegistry) instances the test
//!   can register into at any time
//! - [`TestHarnessBuilder`] - Builder pattern for custom harnesses
//!
//! # Example
//!
//! ```rust
//! use replacements_core::testing::TestHarnessBuilder;
//!
//! let harness = TestHarnessBuilder::new()
//!     .category("items")
//!     .register("items", "modb:new_item", "new item")
//!     .build();
//!
//! harness.coordinator.on_configuration_changed("items", ["moda:old_item=modb:new_item"]);
//! assert_eq!(harness.resolve("items", "moda:old_item"), Some("new item"));
//! ```

pub mod harness;

pub use harness::{RemapTestHarness, TestHarnessBuilder};
