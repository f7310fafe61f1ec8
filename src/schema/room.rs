use serde::{Deserialize, Serialize};

use super::blueprint::{Blueprint, ExitFlags};
use super::direction::{Direction, Orientation, Relative};

/// Newtype wrapper for a room's position in its dungeon (placement order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

/// One door of a room, stored per absolute direction.
///
/// `label` is unset until the room is oriented. `occupant` is a non-owning
/// reference into the dungeon: it only records which neighbor sits behind
/// the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DoorSlot {
    pub label: Option<Relative>,
    pub occupant: Option<RoomId>,
}

/// A placed instance of a blueprint.
#[derive(Debug, Clone)]
pub struct Room<B> {
    blueprint: B,
    pub(crate) doors: [DoorSlot; 4],
}

impl<B: Blueprint> Room<B> {
    /// A fresh, unoriented room with all four doors empty.
    pub fn new(blueprint: B) -> Self {
        Self {
            blueprint,
            doors: [DoorSlot::default(); 4],
        }
    }

    pub fn blueprint(&self) -> &B {
        &self.blueprint
    }

    pub fn name(&self) -> &str {
        self.blueprint.name()
    }

    /// Exit count of the blueprint, i.e. the room's category.
    pub fn category(&self) -> u8 {
        self.blueprint.exit_count()
    }

    pub fn exit_flags(&self) -> ExitFlags {
        self.blueprint.exit_flags()
    }

    /// Hub rooms (three or four exits) unlock dead-end placement.
    pub fn is_hub(&self) -> bool {
        self.category() >= 3
    }

    pub fn is_dead_end(&self) -> bool {
        self.category() == 1
    }

    pub fn door(&self, dir: Direction) -> &DoorSlot {
        &self.doors[dir.index()]
    }

    pub fn doors(&self) -> impl Iterator<Item = (Direction, &DoorSlot)> + '_ {
        Direction::ALL.into_iter().map(|d| (d, &self.doors[d.index()]))
    }

    /// True once the room has received its labels.
    pub fn is_oriented(&self) -> bool {
        self.doors.iter().any(|slot| slot.label.is_some())
    }

    /// The absolute direction labelled `relative`, if oriented.
    pub fn direction_of(&self, relative: Relative) -> Option<Direction> {
        self.doors()
            .find(|(_, slot)| slot.label == Some(relative))
            .map(|(d, _)| d)
    }

    pub fn origin_direction(&self) -> Option<Direction> {
        self.direction_of(Relative::Origin)
    }

    /// The room that placed this one. `None` for the entrance.
    pub fn origin_room(&self) -> Option<RoomId> {
        self.origin_direction()
            .and_then(|d| self.doors[d.index()].occupant)
    }

    /// Occupied doors as `(direction, neighbor)` pairs.
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, RoomId)> + '_ {
        self.doors()
            .filter_map(|(d, slot)| slot.occupant.map(|id| (d, id)))
    }

    /// Absolute directions of the blueprint's outward doors, in the fixed
    /// left, right, ahead priority order. Empty until oriented.
    pub fn outward_directions(&self) -> Vec<Direction> {
        let flags = self.exit_flags();
        [
            (flags.left, Relative::ToLeft),
            (flags.right, Relative::ToRight),
            (flags.ahead, Relative::Ahead),
        ]
        .into_iter()
        .filter(|(has, _)| *has)
        .filter_map(|(_, rel)| self.direction_of(rel))
        .collect()
    }

    /// Outward doors that still lead nowhere.
    pub fn free_exits(&self) -> usize {
        self.outward_directions()
            .into_iter()
            .filter(|d| self.doors[d.index()].occupant.is_none())
            .count()
    }

    pub(crate) fn apply_orientation(&mut self, orientation: Orientation) {
        for (dir, label) in orientation.iter() {
            self.doors[dir.index()].label = Some(label);
        }
    }
}
