/// Per-category room quotas.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::blueprint::MAX_EXITS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuotaError {
    #[error(
        "quota {quota:?} is unbalanced: {dead_ends} dead ends but hubs open {extra_doors} extra doors"
    )]
    Unbalanced {
        quota: Quota,
        dead_ends: usize,
        extra_doors: usize,
    },
}

/// How many blueprints of each exit-count category a dungeon draws.
///
/// Field `n` is the quota for rooms with `n` exits. The entrance and exit
/// rooms are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quota {
    pub one: usize,
    pub two: usize,
    pub three: usize,
    pub four: usize,
}

impl Default for Quota {
    fn default() -> Self {
        Self {
            one: 4,
            two: 3,
            three: 2,
            four: 1,
        }
    }
}

impl Quota {
    /// Quota for `category` (1..=4); zero for anything else.
    pub fn for_category(&self, category: u8) -> usize {
        match category {
            1 => self.one,
            2 => self.two,
            3 => self.three,
            4 => self.four,
            _ => 0,
        }
    }

    /// Rooms drawn from the catalog.
    pub fn total(&self) -> usize {
        self.one + self.two + self.three + self.four
    }

    /// Rooms in a generated dungeon: the quota plus entrance and exit.
    pub fn dungeon_len(&self) -> usize {
        self.total() + 2
    }

    pub fn categories() -> impl Iterator<Item = u8> {
        1..=MAX_EXITS
    }

    /// Check that the quota can be grown into a closed graph.
    ///
    /// Each dead end closes one door and each hub opens one (three exits) or
    /// two (four exits) more than it consumes. With the entrance opening one
    /// door and the exit closing it, every door is filled exactly when the
    /// dead ends match the hubs' extra doors, and the exit is then the last
    /// room placed.
    pub fn validate(&self) -> Result<(), QuotaError> {
        let extra_doors = self.three + 2 * self.four;
        if self.one != extra_doors {
            return Err(QuotaError::Unbalanced {
                quota: *self,
                dead_ends: self.one,
                extra_doors,
            });
        }
        Ok(())
    }
}
