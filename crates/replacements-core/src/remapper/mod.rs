//! Identifier remapping.
//!
//! A [`RemapTable`] holds the replacements for one registry category; the
//! [`RemapCoordinator`] owns one table per category and routes configuration
//! changes, missing-identifier reports and dump requests to them.

mod coordinator;
mod table;

pub use coordinator::{CoordinatorBuilder, DumpReport, DumpSummary, RemapCoordinator};
pub use table::{parse_entry, MissingMapping, ReloadOutcome, RemapEntry, RemapTable, ENTRY_SEPARATOR};
