//! Dungeon Engine — procedural level graphs assembled from room blueprints.
//!
//! Rooms are drawn from per-category quotas and grown breadth-first from a
//! single entrance. Every room is oriented relative to the door it was
//! entered through, every connection is recorded on both sides, and the
//! dedicated exit room is always the last one placed.

pub mod core;
pub mod schema;
