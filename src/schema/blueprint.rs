/// Room blueprint contract — the only thing the generator knows about rooms.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported exit count (one door per absolute direction).
pub const MAX_EXITS: u8 = 4;

/// Which relative outward doors a blueprint has.
///
/// The door behind the visitor (the origin) is never listed here, so a
/// valid blueprint has exactly `exit_count - 1` flags set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExitFlags {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub ahead: bool,
}

impl ExitFlags {
    pub const NONE: ExitFlags = ExitFlags {
        left: false,
        right: false,
        ahead: false,
    };

    pub const ALL: ExitFlags = ExitFlags {
        left: true,
        right: true,
        ahead: true,
    };

    pub fn new(left: bool, right: bool, ahead: bool) -> Self {
        Self { left, right, ahead }
    }

    /// Number of outward doors.
    pub fn count(&self) -> u8 {
        self.left as u8 + self.right as u8 + self.ahead as u8
    }
}

/// A placeable room type.
///
/// `name` identifies the concrete kind: two blueprints with the same name are
/// the same kind, and a catalog may not list a kind twice.
pub trait Blueprint {
    fn name(&self) -> &str;

    /// Total doors, origin included. Also the blueprint's category.
    fn exit_count(&self) -> u8;

    fn exit_flags(&self) -> ExitFlags;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("blueprint '{name}' declares {exits} exits (must be 1..=4)")]
    ExitCountOutOfRange { name: String, exits: u8 },
    #[error(
        "blueprint '{name}' has {exits} exits but {flags} outward doors (expected {})",
        .exits.saturating_sub(1)
    )]
    FlagMismatch { name: String, exits: u8, flags: u8 },
    #[error("blueprint has an empty name")]
    EmptyName,
}

/// Check that a blueprint satisfies the contract.
pub fn check_contract<B: Blueprint + ?Sized>(blueprint: &B) -> Result<(), ContractViolation> {
    let name = blueprint.name();
    if name.is_empty() {
        return Err(ContractViolation::EmptyName);
    }
    let exits = blueprint.exit_count();
    if !(1..=MAX_EXITS).contains(&exits) {
        return Err(ContractViolation::ExitCountOutOfRange {
            name: name.to_string(),
            exits,
        });
    }
    let flags = blueprint.exit_flags().count();
    if flags != exits - 1 {
        return Err(ContractViolation::FlagMismatch {
            name: name.to_string(),
            exits,
            flags,
        });
    }
    Ok(())
}

/// A data-driven blueprint, as loaded from a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomBlueprint {
    pub name: String,
    pub exits: u8,
    #[serde(default)]
    pub flags: ExitFlags,
}

impl RoomBlueprint {
    pub fn new(name: impl Into<String>, exits: u8, flags: ExitFlags) -> Self {
        Self {
            name: name.into(),
            exits,
            flags,
        }
    }
}

impl Blueprint for RoomBlueprint {
    fn name(&self) -> &str {
        &self.name
    }

    fn exit_count(&self) -> u8 {
        self.exits
    }

    fn exit_flags(&self) -> ExitFlags {
        self.flags
    }
}
