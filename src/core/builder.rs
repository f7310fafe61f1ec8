/// The dungeon builder: validation, pool partitioning and breadth-first growth.
///
/// [`generate`] is the stateless entry point, generic over any blueprint
/// type and any random source. [`DungeonGenerator`] wraps it for the common
/// case of a RON catalog and a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use std::path::Path;
use thiserror::Error;

use super::catalog::{Catalog, CatalogError};
use super::connector::ConnectError;
use super::quota::{Quota, QuotaError};
use super::sampler::{Pick, TypePools};
use crate::schema::blueprint::{check_contract, Blueprint, ContractViolation, RoomBlueprint};
use crate::schema::dungeon::Dungeon;
use crate::schema::room::RoomId;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(
        "entrance room must have two doors and exit room one door \
         ('{entrance}' has {entrance_exits}, '{exit}' has {exit_exits})"
    )]
    EndpointExits {
        entrance: String,
        entrance_exits: u8,
        exit: String,
        exit_exits: u8,
    },
    #[error("duplicate blueprint in catalog: '{0}'")]
    DuplicateBlueprint(String),
    #[error("invalid blueprint: {0}")]
    Contract(#[from] ContractViolation),
    #[error("quota error: {0}")]
    Quota(#[from] QuotaError),
    #[error("catalog has {found} blueprints with {category} exits, quota needs {needed}")]
    InsufficientCatalog {
        category: u8,
        needed: usize,
        found: usize,
    },
    #[error("no catalog provided")]
    MissingCatalog,
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("connection error: {0}")]
    Connect(#[from] ConnectError),
    #[error("growth ended with {0} blueprints unplaced")]
    Incomplete(usize),
}

/// Check the inputs of [`generate`] without placing anything.
pub fn validate<B: Blueprint>(
    catalog: &[B],
    entrance: &B,
    exit: &B,
    quota: &Quota,
) -> Result<(), GenerateError> {
    if entrance.exit_count() != 2 || exit.exit_count() != 1 {
        return Err(GenerateError::EndpointExits {
            entrance: entrance.name().to_string(),
            entrance_exits: entrance.exit_count(),
            exit: exit.name().to_string(),
            exit_exits: exit.exit_count(),
        });
    }

    if entrance.name() == exit.name() {
        return Err(GenerateError::DuplicateBlueprint(entrance.name().to_string()));
    }

    let mut seen = FxHashSet::default();
    for blueprint in catalog {
        if !seen.insert(blueprint.name()) {
            return Err(GenerateError::DuplicateBlueprint(blueprint.name().to_string()));
        }
        // An endpoint may be listed in the catalog, but only unchanged.
        let shadows_endpoint = [entrance, exit].into_iter().any(|endpoint| {
            endpoint.name() == blueprint.name()
                && (endpoint.exit_count() != blueprint.exit_count()
                    || endpoint.exit_flags() != blueprint.exit_flags())
        });
        if shadows_endpoint {
            return Err(GenerateError::DuplicateBlueprint(blueprint.name().to_string()));
        }
    }

    check_contract(entrance)?;
    check_contract(exit)?;
    for blueprint in catalog {
        check_contract(blueprint)?;
    }

    quota.validate()?;
    Ok(())
}

/// Generate a dungeon from `catalog`.
///
/// The entrance and exit blueprints are removed from the catalog if listed.
/// Each category is shuffled and cut to its quota, then rooms are grown
/// breadth-first from the entrance: every room with outward doors gets
/// `exits - 1` picks from the sampling policy, attached in order and queued
/// behind the rooms already placed. The exit room fills the last door.
///
/// All configuration errors are reported before the entrance is placed.
pub fn generate<B, R>(
    catalog: &[B],
    entrance: &B,
    exit: &B,
    quota: &Quota,
    rng: &mut R,
) -> Result<Dungeon<B>, GenerateError>
where
    B: Blueprint + Clone,
    R: Rng + ?Sized,
{
    validate(catalog, entrance, exit, quota)?;

    let placeable: Vec<B> = catalog
        .iter()
        .filter(|b| b.name() != entrance.name() && b.name() != exit.name())
        .cloned()
        .collect();
    let mut pools = TypePools::partition(placeable, quota, rng);
    if let Some(short) = pools.shortfall(quota) {
        return Err(GenerateError::InsufficientCatalog {
            category: short.category,
            needed: short.needed,
            found: short.found,
        });
    }

    tracing::debug!(
        entrance = entrance.name(),
        exit = exit.name(),
        rooms = quota.dungeon_len(),
        "generating dungeon"
    );

    let mut dungeon = Dungeon::new();
    dungeon.place_entrance(entrance.clone(), rng)?;

    // The dungeon doubles as the FIFO queue: rooms appended while a room is
    // being filled are visited later in the same loop.
    let mut cursor = 0;
    while cursor < dungeon.len() {
        let current = RoomId(cursor);
        cursor += 1;

        let exits = dungeon.rooms[current.0].category();
        if exits == 1 {
            continue;
        }

        let hub_placed = dungeon.has_hub();
        for pick in pools.sample_for(exits, hub_placed, rng) {
            let blueprint = match pick {
                Pick::Pooled(blueprint) => blueprint,
                Pick::Exit => exit.clone(),
            };
            dungeon.attach_child(current, blueprint)?;
        }
    }

    if !pools.is_empty() {
        return Err(GenerateError::Incomplete(pools.total()));
    }

    tracing::debug!(rooms = dungeon.len(), "dungeon generated");
    Ok(dungeon)
}

/// A seeded generator over a fixed catalog. Built via `DungeonGenerator::builder()`.
///
/// Each call to [`DungeonGenerator::generate`] uses a fresh RNG derived from
/// the seed and the number of dungeons generated so far, so a generator
/// built with the same seed yields the same sequence of dungeons.
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    catalog: Catalog,
    quota: Quota,
    seed: u64,
    generation_count: u64,
}

/// Builder for constructing a `DungeonGenerator`.
#[derive(Debug, Default)]
pub struct DungeonGeneratorBuilder {
    catalog_files: Vec<String>,
    seed: u64,
    /// Directly provided catalog (for testing without files).
    catalog: Option<Catalog>,
    quota: Option<Quota>,
}

impl DungeonGenerator {
    pub fn builder() -> DungeonGeneratorBuilder {
        DungeonGeneratorBuilder::default()
    }

    /// Generate the next dungeon in this generator's sequence.
    pub fn generate(&mut self) -> Result<Dungeon<RoomBlueprint>, GenerateError> {
        let mut rng = StdRng::seed_from_u64(
            self.seed
                .wrapping_add(self.generation_count.wrapping_mul(7919)), // prime stride per dungeon
        );
        let dungeon = generate(
            &self.catalog.blueprints,
            &self.catalog.entrance,
            &self.catalog.exit,
            &self.quota,
            &mut rng,
        )?;
        self.generation_count += 1;
        Ok(dungeon)
    }

    /// Generate `count` successive dungeons.
    pub fn generate_variants(
        &mut self,
        count: usize,
    ) -> Result<Vec<Dungeon<RoomBlueprint>>, GenerateError> {
        (0..count).map(|_| self.generate()).collect()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn quota(&self) -> &Quota {
        &self.quota
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generation_count(&self) -> u64 {
        self.generation_count
    }
}

impl DungeonGeneratorBuilder {
    /// Add a catalog file. Files are merged in order, after any catalog
    /// given with [`with_catalog`](Self::with_catalog).
    pub fn catalog_file(mut self, path: &str) -> Self {
        self.catalog_files.push(path.to_string());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the quota declared by the catalog.
    pub fn quota(mut self, quota: Quota) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Provide a catalog directly (for testing without files).
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Load and merge catalogs, then validate the result.
    pub fn build(self) -> Result<DungeonGenerator, GenerateError> {
        let mut catalog = self.catalog;
        for file in &self.catalog_files {
            let loaded = Catalog::load_from_ron(Path::new(file))?;
            catalog = Some(match catalog.take() {
                Some(mut existing) => {
                    existing.merge(loaded);
                    existing
                }
                None => loaded,
            });
        }
        let catalog = catalog.ok_or(GenerateError::MissingCatalog)?;
        let quota = self.quota.unwrap_or_else(|| catalog.effective_quota());

        validate(&catalog.blueprints, &catalog.entrance, &catalog.exit, &quota)?;

        Ok(DungeonGenerator {
            catalog,
            quota,
            seed: self.seed,
            generation_count: 0,
        })
    }
}
