//! Read-only configuration tables: law catalog, position ladder, action catalog
//!
//! Loaded from TOML. The built-in tables ship in `data/catalog.toml`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;
use crate::core::error::Result;
use crate::core::types::{Rank, Track};
use crate::world::LawCategory;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawDefinition {
    pub id: String,
    pub name: String,
    pub category: LawCategory,
    #[serde(default)]
    pub safeguard: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionDefinition {
    pub track: Track,
    pub rank: Rank,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub id: String,
    pub kind: ActionKind,
    /// Treasury cost
    #[serde(default)]
    pub cost: i32,
    /// Turns before the action can be used again
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default = "default_min_rank")]
    pub min_rank: Rank,
    #[serde(default)]
    pub needs_target: bool,
}

fn default_min_rank() -> Rank {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub laws: Vec<LawDefinition>,
    #[serde(default)]
    pub positions: Vec<PositionDefinition>,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

impl Catalog {
    /// The tables bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn law(&self, id: &str) -> Option<&LawDefinition> {
        self.laws.iter().find(|l| l.id == id)
    }

    pub fn action(&self, id: &str) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Title for a slot. Ranks without their own entry borrow the nearest
    /// lower title on the same track.
    pub fn title(&self, track: Track, rank: Rank) -> Option<&str> {
        self.positions
            .iter()
            .filter(|p| p.track == track && p.rank <= rank)
            .max_by_key(|p| p.rank)
            .map(|p| p.title.as_str())
    }
}
