pub mod blueprint;
pub mod direction;
pub mod dungeon;
pub mod room;
