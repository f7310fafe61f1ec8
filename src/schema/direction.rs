use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four absolute (external) directions a door can face.
///
/// The declaration order is the cyclic order East → South → West → North,
/// i.e. each variant is a clockwise quarter turn from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    East,
    South,
    West,
    North,
}

impl Direction {
    /// All four directions in cyclic order. Door slots are indexed by this order.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Position of this direction in [`Direction::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::East => 0,
            Self::South => 1,
            Self::West => 2,
            Self::North => 3,
        }
    }

    /// The direction facing the other way: East ↔ West, South ↔ North.
    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 2) % 4]
    }

    /// A quarter turn to the right of someone facing this direction.
    pub fn clockwise(self) -> Direction {
        Self::ALL[(self.index() + 1) % 4]
    }

    /// A quarter turn to the left of someone facing this direction.
    pub fn counter_clockwise(self) -> Direction {
        Self::ALL[(self.index() + 3) % 4]
    }

    /// Lowercase name: "east", "south", "west", "north".
    pub fn name(self) -> &'static str {
        match self {
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
            Self::North => "north",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A door's label relative to the room's internal orientation.
///
/// Narration inside a room is written as if the visitor stands with their
/// back to the `Origin` door, so `ToLeft` is always on their left no matter
/// how the room is rotated in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relative {
    Origin,
    Ahead,
    ToLeft,
    ToRight,
}

impl Relative {
    pub fn name(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Ahead => "ahead",
            Self::ToLeft => "to_left",
            Self::ToRight => "to_right",
        }
    }
}

impl fmt::Display for Relative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four relative labels of a room, indexed by absolute direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation {
    labels: [Relative; 4],
}

impl Orientation {
    /// Rotation table: the orientation of a room entered by moving through `crest`.
    ///
    /// The visitor keeps facing `crest`, so `crest` is ahead, the door they
    /// came through is behind them (the opposite of `crest`), and right/left
    /// are the clockwise/counter-clockwise neighbors of `crest`.
    ///
    /// | crest | origin | ahead | to_right | to_left |
    /// |-------|--------|-------|----------|---------|
    /// | east  | west   | east  | south    | north   |
    /// | south | north  | south | west     | east    |
    /// | west  | east   | west  | north    | south   |
    /// | north | south  | north | east     | west    |
    pub fn entered_through(crest: Direction) -> Orientation {
        let mut labels = [Relative::Origin; 4];
        labels[crest.index()] = Relative::Ahead;
        labels[crest.opposite().index()] = Relative::Origin;
        labels[crest.clockwise().index()] = Relative::ToRight;
        labels[crest.counter_clockwise().index()] = Relative::ToLeft;
        Orientation { labels }
    }

    /// Relative label carried by the absolute direction `dir`.
    pub fn label(&self, dir: Direction) -> Relative {
        self.labels[dir.index()]
    }

    /// Absolute direction carrying the relative label `relative`.
    pub fn direction_of(&self, relative: Relative) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| self.labels[d.index()] == relative)
    }

    /// `(direction, label)` pairs in cyclic order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Relative)> + '_ {
        Direction::ALL.into_iter().map(|d| (d, self.labels[d.index()]))
    }
}
