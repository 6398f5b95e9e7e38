//! Namespaced registry identifiers.
//!
//! Identifiers follow the host's resource location rules:
//!
//! - `namespace:path`, where the namespace may only contain `a-z 0-9 _ - .`
//!   and the path may additionally contain `/`
//! - a missing namespace (`stone` or `:stone`) means [`DEFAULT_NAMESPACE`]
//! - the path must not be empty
//!
//! Two identifiers are equal iff their canonical `namespace:path` forms are
//! equal, and they order by that string.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// Namespace assumed when an identifier omits one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

static NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_.-]+$").expect("valid regex"));

static PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_./-]+$").expect("valid regex"));

/// A registry key of the form `namespace:path`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    /// Canonical `namespace:path` form.
    full: String,
    /// Byte index of the `:` separator in `full`.
    split: usize,
}

impl Identifier {
    /// Parse an identifier, applying the default namespace when none is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or either segment contains a
    /// disallowed character. A second `:` always ends up in the path and is
    /// rejected there.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let (namespace, path) = match input.find(':') {
            Some(0) | None => (DEFAULT_NAMESPACE, input.strip_prefix(':').unwrap_or(input)),
            Some(idx) => (&input[..idx], &input[idx + 1..]),
        };

        if path.is_empty() {
            return Err(IdentifierError::EmptyPath(input.to_string()));
        }
        if !NAMESPACE_RE.is_match(namespace) {
            return Err(IdentifierError::InvalidNamespace {
                input: input.to_string(),
                namespace: namespace.to_string(),
            });
        }
        if !PATH_RE.is_match(path) {
            return Err(IdentifierError::InvalidPath {
                input: input.to_string(),
                path: path.to_string(),
            });
        }

        Ok(Self {
            full: format!("{namespace}:{path}"),
            split: namespace.len(),
        })
    }

    /// Build an identifier from separate segments.
    ///
    /// # Errors
    ///
    /// Returns an error under the same rules as [`Identifier::parse`].
    pub fn new(namespace: &str, path: &str) -> Result<Self, IdentifierError> {
        if namespace.is_empty() {
            return Self::parse(path);
        }
        Self::parse(&format!("{namespace}:{path}"))
    }

    /// The namespace, usually a mod id.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.full[self.split + 1..]
    }

    /// The canonical `namespace:path` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.full
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespaced() {
        let id = Identifier::parse("moda:old_item").unwrap();
        assert_eq!(id.namespace(), "moda");
        assert_eq!(id.path(), "old_item");
        assert_eq!(id.as_str(), "moda:old_item");
    }

    #[test]
    fn test_default_namespace() {
        let bare = Identifier::parse("stone").unwrap();
        assert_eq!(bare.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(bare.to_string(), "minecraft:stone");

        let leading_colon = Identifier::parse(":stone").unwrap();
        assert_eq!(bare, leading_colon);
    }

    #[test]
    fn test_path_allows_slashes_and_dots() {
        let id = Identifier::parse("mod-a:textures/block.stone_1").unwrap();
        assert_eq!(id.path(), "textures/block.stone_1");
    }

    #[test]
    fn test_rejects_empty_path() {
        assert!(matches!(
            Identifier::parse("moda:"),
            Err(IdentifierError::EmptyPath(_))
        ));
        assert!(matches!(
            Identifier::parse(""),
            Err(IdentifierError::EmptyPath(_))
        ));
    }

    #[test]
    fn test_rejects_bad_characters() {
        assert!(matches!(
            Identifier::parse("ModA:item"),
            Err(IdentifierError::InvalidNamespace { .. })
        ));
        assert!(matches!(
            Identifier::parse("moda:Item"),
            Err(IdentifierError::InvalidPath { .. })
        ));
        assert!(matches!(
            Identifier::parse("moda:old item"),
            Err(IdentifierError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_rejects_second_separator() {
        assert!(matches!(
            Identifier::parse("a:b:c"),
            Err(IdentifierError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_new_from_segments() {
        let id = Identifier::new("modb", "new_item").unwrap();
        assert_eq!(id, Identifier::parse("modb:new_item").unwrap());
        assert_eq!(Identifier::new("", "dirt").unwrap().namespace(), "minecraft");
    }

    #[test]
    fn test_ordering_follows_string_form() {
        let mut ids: Vec<Identifier> = ["modb:a", "moda:z", "moda:b"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(Identifier::as_str).collect();
        assert_eq!(sorted, vec!["moda:b", "moda:z", "modb:a"]);
    }

    #[test]
    fn test_serde_as_string() {
        let id: Identifier = serde_yaml::from_str("'moda:thing'").unwrap();
        assert_eq!(id.as_str(), "moda:thing");
        assert!(serde_yaml::from_str::<Identifier>("'Bad Id'").is_err());

        let yaml = serde_yaml::to_string(&id).unwrap();
        assert!(yaml.contains("moda:thing"));
        assert_eq!(serde_yaml::from_str::<Identifier>(&yaml).unwrap(), id);
    }
}
