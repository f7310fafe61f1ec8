/// Catalog files — the blueprint lists a generator draws from.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::quota::Quota;
use crate::schema::blueprint::{Blueprint, RoomBlueprint};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON serialization error: {0}")]
    RonWrite(#[from] ron::Error),
}

/// Everything needed to generate a dungeon: the two dedicated rooms, an
/// optional quota override and the pool of placeable blueprints.
///
/// ```ron
/// (
///     entrance: (name: "gate", exits: 2, flags: (ahead: true)),
///     exit: (name: "stairs", exits: 1),
///     quota: Some((one: 4, two: 3, three: 2, four: 1)),
///     blueprints: [
///         (name: "armory", exits: 1),
///         (name: "hall", exits: 4, flags: (left: true, right: true, ahead: true)),
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub entrance: RoomBlueprint,
    pub exit: RoomBlueprint,
    #[serde(default)]
    pub quota: Option<Quota>,
    #[serde(default)]
    pub blueprints: Vec<RoomBlueprint>,
}

impl Catalog {
    pub fn new(entrance: RoomBlueprint, exit: RoomBlueprint) -> Self {
        Self {
            entrance,
            exit,
            quota: None,
            blueprints: Vec::new(),
        }
    }

    /// Load a catalog from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Catalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a catalog from a RON string.
    pub fn parse_ron(input: &str) -> Result<Catalog, CatalogError> {
        Ok(ron::from_str(input)?)
    }

    pub fn to_ron(&self) -> Result<String, CatalogError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Quota declared by the catalog, or the default one.
    pub fn effective_quota(&self) -> Quota {
        self.quota.unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&RoomBlueprint> {
        self.blueprints.iter().find(|b| b.name() == name)
    }

    /// Merge another catalog into this one. The other catalog's entrance,
    /// exit and quota (if set) win; blueprints with the same name are
    /// replaced in place and new ones are appended.
    pub fn merge(&mut self, other: Catalog) {
        self.entrance = other.entrance;
        self.exit = other.exit;
        if other.quota.is_some() {
            self.quota = other.quota;
        }
        for blueprint in other.blueprints {
            match self.blueprints.iter_mut().find(|b| b.name == blueprint.name) {
                Some(existing) => *existing = blueprint,
                None => self.blueprints.push(blueprint),
            }
        }
    }
}
