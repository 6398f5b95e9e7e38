//! Standard registry categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RemapError;

/// A registry category supported out of the box.
///
/// The coordinator is keyed by plain names, so hosts can add categories that
/// are not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Blocks,
    Fluids,
    Items,
    /// Status effects.
    Effects,
    /// Brewable potion types.
    Potions,
    Enchantments,
    /// Entity types.
    Entities,
    /// Block entity (tile entity) types.
    BlockEntities,
}

impl Category {
    /// Every standard category, in the order tables are created.
    pub const ALL: [Category; 8] = [
        Self::Blocks,
        Self::Fluids,
        Self::Items,
        Self::Effects,
        Self::Potions,
        Self::Enchantments,
        Self::Entities,
        Self::BlockEntities,
    ];

    /// Names older configurations used, paired with the category they meant.
    pub const LEGACY_NAMES: [(&'static str, Category); 1] = [("block_entites", Self::BlockEntities)];

    /// The configuration and command name of the category.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::Fluids => "fluids",
            Self::Items => "items",
            Self::Effects => "effects",
            Self::Potions => "potions",
            Self::Enchantments => "enchantments",
            Self::Entities => "entities",
            Self::BlockEntities => "block_entities",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = RemapError;

    /// Accepts current names and [`Category::LEGACY_NAMES`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .or_else(|| {
                Self::LEGACY_NAMES
                    .into_iter()
                    .find_map(|(legacy, c)| (legacy == s).then_some(c))
            })
            .ok_or_else(|| RemapError::UnknownCategory(s.to_string()))
    }
}
