//! Domain error types for registry replacements.
//!
//! Uses `thiserror` for ergonomic error definitions with proper context.

use thiserror::Error;

use crate::identifier::Identifier;

/// Errors produced when parsing an [`Identifier`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Nothing after the namespace separator.
    #[error("empty path in identifier '{0}'")]
    EmptyPath(String),

    /// Namespace contains a character outside `[a-z0-9_.-]`.
    #[error("invalid namespace '{namespace}' in identifier '{input}'")]
    InvalidNamespace { input: String, namespace: String },

    /// Path contains a character outside `[a-z0-9_.-/]`.
    #[error("invalid path '{path}' in identifier '{input}'")]
    InvalidPath { input: String, path: String },
}

/// Which half of an `old=new` entry a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySide {
    Old,
    New,
}

impl std::fmt::Display for EntrySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Old => f.write_str("old"),
            Self::New => f.write_str("new"),
        }
    }
}

/// Reasons a raw `old=new` configuration entry is rejected.
///
/// These never escape a reload; they are logged and the entry is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// Not exactly two non-empty `=`-separated parts.
    #[error("wrong number of parts in entry '{0}' (expected 'old_mod:old_id=new_mod:new_id')")]
    MalformedEntry(String),

    /// One side of the entry is not a valid identifier.
    #[error("invalid {side} name: {source}")]
    InvalidIdentifierSyntax {
        side: EntrySide,
        #[source]
        source: IdentifierError,
    },

    /// The replacement is not present in the live registry.
    #[error("unknown registry key {new_id} for old name {old_id}")]
    UnknownTargetIdentifier { old_id: Identifier, new_id: Identifier },
}

/// Errors surfaced to callers of the remapping coordinator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemapError {
    /// The category is not managed by this coordinator.
    #[error("unknown registry category: {0}")]
    UnknownCategory(String),
}

/// Errors related to configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Result type alias for entry validation.
pub type EntryResult<T> = std::result::Result<T, EntryError>;

/// Result type alias for coordinator operations.
pub type RemapResult<T> = std::result::Result<T, RemapError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
