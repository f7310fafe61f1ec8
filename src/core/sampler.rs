/// Type pools and the sampling policy that decides which blueprint comes next.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

use super::quota::Quota;
use crate::schema::blueprint::{Blueprint, MAX_EXITS};

/// Outcome of a single draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick<B> {
    /// A blueprint taken from one of the pools.
    Pooled(B),
    /// Every pool is empty: the slot goes to the dedicated exit room.
    Exit,
}

/// A category that ran short while partitioning the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub category: u8,
    pub needed: usize,
    pub found: usize,
}

/// Unplaced blueprints, one shuffled queue per exit-count category.
#[derive(Debug, Clone)]
pub struct TypePools<B> {
    pools: [VecDeque<B>; MAX_EXITS as usize],
}

impl<B> Default for TypePools<B> {
    fn default() -> Self {
        Self {
            pools: std::array::from_fn(|_| VecDeque::new()),
        }
    }
}

impl<B: Blueprint> TypePools<B> {
    /// Split `catalog` by category, shuffle each category and keep only its
    /// quota. Surplus blueprints are dropped, so successive dungeons draw
    /// different subsets of a large catalog.
    pub fn partition<R>(catalog: Vec<B>, quota: &Quota, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut by_category: [Vec<B>; MAX_EXITS as usize] = std::array::from_fn(|_| Vec::new());
        for blueprint in catalog {
            if let Some(bucket) = (blueprint.exit_count() as usize)
                .checked_sub(1)
                .and_then(|i| by_category.get_mut(i))
            {
                bucket.push(blueprint);
            }
        }

        let mut pools = Self::default();
        for (i, mut bucket) in by_category.into_iter().enumerate() {
            bucket.shuffle(rng);
            bucket.truncate(quota.for_category(i as u8 + 1));
            pools.pools[i] = bucket.into();
        }
        pools
    }

    /// The first category holding fewer blueprints than its quota.
    pub fn shortfall(&self, quota: &Quota) -> Option<Shortfall> {
        Quota::categories().find_map(|category| {
            let needed = quota.for_category(category);
            let found = self.len_of(category);
            (found < needed).then_some(Shortfall {
                category,
                needed,
                found,
            })
        })
    }

    pub fn len_of(&self, category: u8) -> usize {
        self.pool(category).map_or(0, VecDeque::len)
    }

    pub fn total(&self) -> usize {
        self.pools.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(VecDeque::is_empty)
    }

    /// Blueprints left in `category`, next draw first.
    pub fn remaining(&self, category: u8) -> impl Iterator<Item = &B> + '_ {
        self.pool(category).into_iter().flatten()
    }

    /// Draw `exits - 1` picks for a room with `exits` doors.
    ///
    /// Rules, applied per draw:
    /// - a category is permitted only while its pool is non-empty;
    /// - dead ends (category 1) need a hub already in the dungeon
    ///   (`hub_placed`) and a positive per-room dead-end allowance, which
    ///   starts at `exits - 2`, drops by one per dead end drawn, and grows
    ///   by one on every draw made once nothing but dead ends remain;
    /// - the category is chosen uniformly among those permitted;
    /// - with nothing permitted the pick is [`Pick::Exit`].
    pub fn sample_for<R>(&mut self, exits: u8, hub_placed: bool, rng: &mut R) -> Vec<Pick<B>>
    where
        R: Rng + ?Sized,
    {
        let draws = exits.saturating_sub(1) as usize;
        let mut dead_end_allowance = exits as i32 - 2;
        let mut picks = Vec::with_capacity(draws);

        for _ in 0..draws {
            if self.only_dead_ends_left() {
                dead_end_allowance += 1;
            }

            let permitted: Vec<u8> = Quota::categories()
                .filter(|&c| self.len_of(c) > 0)
                .filter(|&c| c != 1 || (hub_placed && dead_end_allowance >= 1))
                .collect();

            if permitted.is_empty() {
                picks.push(Pick::Exit);
                continue;
            }

            let category = permitted[rng.gen_range(0..permitted.len())];
            if category == 1 {
                dead_end_allowance -= 1;
            }
            match self.pool_mut(category).and_then(VecDeque::pop_front) {
                Some(blueprint) => picks.push(Pick::Pooled(blueprint)),
                None => picks.push(Pick::Exit),
            }
        }

        let names: Vec<&str> = picks
            .iter()
            .map(|p| match p {
                Pick::Pooled(b) => b.name(),
                Pick::Exit => "<exit>",
            })
            .collect();
        tracing::debug!(exits, hub_placed, picked = ?names, "sampled rooms");
        picks
    }

    fn only_dead_ends_left(&self) -> bool {
        (2..=MAX_EXITS).all(|c| self.len_of(c) == 0)
    }

    fn pool(&self, category: u8) -> Option<&VecDeque<B>> {
        (category as usize)
            .checked_sub(1)
            .and_then(|i| self.pools.get(i))
    }

    fn pool_mut(&mut self, category: u8) -> Option<&mut VecDeque<B>> {
        (category as usize)
            .checked_sub(1)
            .and_then(|i| self.pools.get_mut(i))
    }
}
