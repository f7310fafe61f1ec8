/// Connector — orientation assignment and two-way room linking.
///
/// A room is oriented exactly once: the entrance by [`bootstrap`], every
/// other room by the connection that places it. After that the only change
/// a room sees is one of its outward doors being claimed by a child.

use rand::Rng;
use thiserror::Error;

use crate::schema::blueprint::Blueprint;
use crate::schema::direction::{Direction, Orientation};
use crate::schema::dungeon::Dungeon;
use crate::schema::room::{Room, RoomId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("room '{parent}' already leads to a '{kind}' room")]
    DuplicateRoom { parent: String, kind: String },
    #[error("all doors of room '{parent}' are occupied, '{target}' not added")]
    NoFreeSlot { parent: String, target: String },
    #[error("room {origin:?} must lead to '{room}' before '{room}' can lead back to it")]
    OrphanOrientation { room: String, origin: RoomId },
    #[error("room '{0}' is already oriented")]
    AlreadyOriented(String),
    #[error("room '{0}' has not been oriented yet")]
    NotOriented(String),
    #[error("room '{0}' cannot be oriented without a crest")]
    MissingCrest(String),
    #[error("dungeon already has an entrance")]
    EntranceExists,
    #[error("room not found: {0:?}")]
    UnknownRoom(RoomId),
}

/// Orient a room that has no predecessor.
///
/// A direction picked uniformly at random acts as a synthetic crest: it
/// becomes the room's `Ahead` door and its opposite becomes the
/// pseudo-origin, which stays unoccupied.
pub fn bootstrap<'a, B, R>(room: &'a mut Room<B>, rng: &mut R) -> Result<&'a mut Room<B>, ConnectError>
where
    B: Blueprint,
    R: Rng + ?Sized,
{
    if room.is_oriented() {
        return Err(ConnectError::AlreadyOriented(room.name().to_string()));
    }
    let crest = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
    assign_origin(room, None, Some(crest))
}

/// Orient `target` as entered from `origin_room` through `crest`.
///
/// `crest` is the direction of the door used, seen from the origin room, so
/// the target's origin door is the opposite of `crest` and it records
/// `origin_room` as its occupant.
pub fn assign_origin<B: Blueprint>(
    target: &mut Room<B>,
    origin_room: Option<RoomId>,
    crest: Option<Direction>,
) -> Result<&mut Room<B>, ConnectError> {
    let crest = match (origin_room, crest) {
        (_, Some(crest)) => crest,
        (Some(origin), None) => {
            return Err(ConnectError::OrphanOrientation {
                room: target.name().to_string(),
                origin,
            })
        }
        (None, None) => return Err(ConnectError::MissingCrest(target.name().to_string())),
    };
    if target.is_oriented() {
        return Err(ConnectError::AlreadyOriented(target.name().to_string()));
    }

    target.apply_orientation(Orientation::entered_through(crest));
    target.doors[crest.opposite().index()].occupant = origin_room;
    Ok(target)
}

impl<B: Blueprint> Dungeon<B> {
    /// Place and bootstrap the first room.
    pub fn place_entrance<R: Rng + ?Sized>(
        &mut self,
        blueprint: B,
        rng: &mut R,
    ) -> Result<RoomId, ConnectError> {
        if !self.is_empty() {
            return Err(ConnectError::EntranceExists);
        }
        let mut room = Room::new(blueprint);
        bootstrap(&mut room, rng)?;
        let id = self.push(room);
        tracing::trace!(
            room = self.rooms[id.0].name(),
            origin = ?self.rooms[id.0].origin_direction(),
            "entrance placed"
        );
        Ok(id)
    }

    /// Instantiate `blueprint` behind the first free outward door of `parent`.
    ///
    /// Doors are tried in left, right, ahead order. On success both rooms
    /// point at each other and the new room's id is returned; on failure the
    /// dungeon is left untouched.
    pub fn attach_child(&mut self, parent: RoomId, blueprint: B) -> Result<RoomId, ConnectError> {
        let parent_room = self.get(parent).ok_or(ConnectError::UnknownRoom(parent))?;
        if !parent_room.is_oriented() {
            return Err(ConnectError::NotOriented(parent_room.name().to_string()));
        }

        let duplicate = parent_room.neighbors().any(|(_, neighbor)| {
            self.get(neighbor)
                .is_some_and(|n| n.name() == blueprint.name())
        });
        if duplicate {
            return Err(ConnectError::DuplicateRoom {
                parent: parent_room.name().to_string(),
                kind: blueprint.name().to_string(),
            });
        }

        let crest = parent_room
            .outward_directions()
            .into_iter()
            .find(|d| parent_room.door(*d).occupant.is_none())
            .ok_or_else(|| ConnectError::NoFreeSlot {
                parent: parent_room.name().to_string(),
                target: blueprint.name().to_string(),
            })?;

        let child_id = RoomId(self.len());
        let mut child = Room::new(blueprint);
        assign_origin(&mut child, Some(parent), Some(crest))?;

        if let Some(parent_room) = self.get_mut(parent) {
            parent_room.doors[crest.index()].occupant = Some(child_id);
        }
        self.push(child);

        tracing::trace!(
            parent = parent.0,
            child = child_id.0,
            %crest,
            "rooms connected"
        );
        Ok(child_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::blueprint::{ExitFlags, RoomBlueprint};
    use crate::schema::direction::Relative;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bp(name: &str, exits: u8, left: bool, right: bool, ahead: bool) -> RoomBlueprint {
        RoomBlueprint::new(name, exits, ExitFlags::new(left, right, ahead))
    }

    fn leaf(name: &str) -> RoomBlueprint {
        bp(name, 1, false, false, false)
    }

    #[test]
    fn bootstrap_orients_without_occupant() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut room = Room::new(bp("entrance", 2, true, false, false));
        bootstrap(&mut room, &mut rng).unwrap();

        assert!(room.is_oriented());
        let origin = room.origin_direction().unwrap();
        assert_eq!(room.direction_of(Relative::Ahead), Some(origin.opposite()));
        assert_eq!(room.origin_room(), None);
        assert_eq!(room.neighbors().count(), 0);
    }

    #[test]
    fn bootstrap_with_zero_stream_picks_east() {
        let mut rng = StepRng::new(0, 0);
        let mut room = Room::new(bp("entrance", 2, true, false, false));
        bootstrap(&mut room, &mut rng).unwrap();
        assert_eq!(room.direction_of(Relative::Ahead), Some(Direction::East));
        assert_eq!(room.origin_direction(), Some(Direction::West));
        assert_eq!(room.direction_of(Relative::ToLeft), Some(Direction::North));
    }

    #[test]
    fn bootstrap_twice_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut room = Room::new(bp("entrance", 2, true, false, false));
        bootstrap(&mut room, &mut rng).unwrap();
        let err = bootstrap(&mut room, &mut rng).unwrap_err();
        assert_eq!(err, ConnectError::AlreadyOriented("entrance".to_string()));
    }

    #[test]
    fn origin_without_crest_is_orphan() {
        let mut room = Room::new(leaf("lost"));
        let err = assign_origin(&mut room, Some(RoomId(3)), None).unwrap_err();
        assert!(matches!(err, ConnectError::OrphanOrientation { origin: RoomId(3), .. }));
        assert!(!room.is_oriented());
    }

    #[test]
    fn assign_origin_needs_a_crest() {
        let mut room = Room::new(leaf("lost"));
        let err = assign_origin(&mut room, None, None).unwrap_err();
        assert_eq!(err, ConnectError::MissingCrest("lost".to_string()));
    }

    #[test]
    fn assign_origin_links_back() {
        let mut room = Room::new(bp("hall", 4, true, true, true));
        assign_origin(&mut room, Some(RoomId(0)), Some(Direction::South)).unwrap();
        assert_eq!(room.origin_direction(), Some(Direction::North));
        assert_eq!(room.origin_room(), Some(RoomId(0)));
        assert_eq!(room.door(Direction::West).label, Some(Relative::ToRight));
        assert_eq!(room.door(Direction::East).label, Some(Relative::ToLeft));
        assert_eq!(room.door(Direction::West).occupant, None);
    }

    #[test]
    fn attach_links_both_ways() {
        let mut rng = StepRng::new(0, 0);
        let mut d = Dungeon::new();
        let entrance = d.place_entrance(bp("entrance", 2, true, false, false), &mut rng).unwrap();
        let child = d.attach_child(entrance, leaf("closet")).unwrap();

        // Entrance faces east, so its left door is north.
        assert_eq!(d.get(entrance).unwrap().door(Direction::North).occupant, Some(child));
        let closet = d.get(child).unwrap();
        assert_eq!(closet.origin_direction(), Some(Direction::South));
        assert_eq!(closet.origin_room(), Some(entrance));
        assert!(d.is_consistent());
    }

    #[test]
    fn attach_fills_left_then_right_then_ahead() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut d = Dungeon::new();
        let hub = d.place_entrance(bp("hall", 4, true, true, true), &mut rng).unwrap();
        let a = d.attach_child(hub, leaf("a")).unwrap();
        let b = d.attach_child(hub, leaf("b")).unwrap();
        let c = d.attach_child(hub, leaf("c")).unwrap();

        let hall = d.get(hub).unwrap();
        assert_eq!(hall.door(hall.direction_of(Relative::ToLeft).unwrap()).occupant, Some(a));
        assert_eq!(hall.door(hall.direction_of(Relative::ToRight).unwrap()).occupant, Some(b));
        assert_eq!(hall.door(hall.direction_of(Relative::Ahead).unwrap()).occupant, Some(c));
        assert_eq!(hall.free_exits(), 0);
        assert!(d.is_consistent());
    }

    #[test]
    fn attach_beyond_capacity_fails() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut d = Dungeon::new();
        let entrance = d.place_entrance(bp("r21", 2, true, false, false), &mut rng).unwrap();
        d.attach_child(entrance, leaf("r12")).unwrap();

        let err = d.attach_child(entrance, leaf("r13")).unwrap_err();
        assert_eq!(
            err,
            ConnectError::NoFreeSlot {
                parent: "r21".to_string(),
                target: "r13".to_string()
            }
        );
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn attach_duplicate_kind_fails() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut d = Dungeon::new();
        let entrance = d.place_entrance(bp("r31", 3, true, true, false), &mut rng).unwrap();
        d.attach_child(entrance, leaf("r11")).unwrap();

        let err = d.attach_child(entrance, leaf("r11")).unwrap_err();
        assert!(matches!(err, ConnectError::DuplicateRoom { ref kind, .. } if kind == "r11"));
        assert_eq!(d.len(), 2);
        assert_eq!(d.get(entrance).unwrap().free_exits(), 1);
    }

    #[test]
    fn duplicate_check_includes_origin_neighbor() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut d = Dungeon::new();
        let first = d.place_entrance(bp("twin", 3, true, true, false), &mut rng).unwrap();
        let second = d.attach_child(first, bp("mid", 2, false, false, true)).unwrap();
        let err = d.attach_child(second, bp("twin", 3, true, true, false)).unwrap_err();
        assert!(matches!(err, ConnectError::DuplicateRoom { .. }));
    }

    #[test]
    fn second_entrance_rejected() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut d = Dungeon::new();
        d.place_entrance(bp("entrance", 2, true, false, false), &mut rng).unwrap();
        let err = d
            .place_entrance(bp("entrance2", 2, true, false, false), &mut rng)
            .unwrap_err();
        assert_eq!(err, ConnectError::EntranceExists);
    }

    #[test]
    fn unknown_parent_rejected() {
        let mut d: Dungeon<RoomBlueprint> = Dungeon::new();
        let err = d.attach_child(RoomId(0), leaf("x")).unwrap_err();
        assert_eq!(err, ConnectError::UnknownRoom(RoomId(0)));
    }
}
