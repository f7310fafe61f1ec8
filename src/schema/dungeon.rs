use super::blueprint::{Blueprint, MAX_EXITS};
use super::direction::Direction;
use super::room::{Room, RoomId};

/// Every placed room, in placement order.
///
/// The dungeon owns its rooms; doors refer to neighbors by [`RoomId`]. The
/// first room is the entrance and, for a generated dungeon, the last room is
/// the exit.
#[derive(Debug, Clone)]
pub struct Dungeon<B> {
    pub(crate) rooms: Vec<Room<B>>,
}

impl<B> Default for Dungeon<B> {
    fn default() -> Self {
        Self { rooms: Vec::new() }
    }
}

impl<B: Blueprint> Dungeon<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, id: RoomId) -> Option<&Room<B>> {
        self.rooms.get(id.0)
    }

    pub fn rooms(&self) -> &[Room<B>] {
        &self.rooms
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &Room<B>)> + '_ {
        self.rooms.iter().enumerate().map(|(i, r)| (RoomId(i), r))
    }

    pub fn entrance(&self) -> Option<&Room<B>> {
        self.rooms.first()
    }

    pub fn exit(&self) -> Option<&Room<B>> {
        self.rooms.last()
    }

    /// True if any room with three or four exits has been placed.
    pub fn has_hub(&self) -> bool {
        self.rooms.iter().any(Room::is_hub)
    }

    /// Placed rooms per category; index 0 holds category 1.
    pub fn count_by_category(&self) -> [usize; MAX_EXITS as usize] {
        let mut counts = [0; MAX_EXITS as usize];
        for room in &self.rooms {
            if let Some(slot) = (room.category() as usize)
                .checked_sub(1)
                .and_then(|i| counts.get_mut(i))
            {
                *slot += 1;
            }
        }
        counts
    }

    /// Does every occupied door of room `id` lead to a room whose opposite
    /// door points straight back at `id`?
    pub fn leads_back(&self, id: RoomId) -> bool {
        let Some(room) = self.get(id) else {
            return false;
        };
        room.neighbors().all(|(dir, neighbor)| {
            self.get(neighbor)
                .map(|n| n.door(dir.opposite()).occupant == Some(id))
                .unwrap_or(false)
        })
    }

    /// Doors whose neighbor does not link back, as `(room, direction)` pairs.
    pub fn broken_links(&self) -> Vec<(RoomId, Direction)> {
        let mut broken = Vec::new();
        for (id, room) in self.iter() {
            for (dir, neighbor) in room.neighbors() {
                let ok = self
                    .get(neighbor)
                    .map(|n| n.door(dir.opposite()).occupant == Some(id))
                    .unwrap_or(false);
                if !ok {
                    broken.push((id, dir));
                }
            }
        }
        broken
    }

    /// Bidirectional consistency of the whole graph.
    pub fn is_consistent(&self) -> bool {
        (0..self.rooms.len()).all(|i| self.leads_back(RoomId(i)))
    }

    pub(crate) fn get_mut(&mut self, id: RoomId) -> Option<&mut Room<B>> {
        self.rooms.get_mut(id.0)
    }

    pub(crate) fn push(&mut self, room: Room<B>) -> RoomId {
        self.rooms.push(room);
        RoomId(self.rooms.len() - 1)
    }
}
