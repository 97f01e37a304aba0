use super::fleet::ShipClass;

pub const BOARD_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 10;

/// The canonical fleet, largest first. Random placement walks it in this
/// order so the long ships claim space before the grid fills up.
pub const FLEET: [ShipClass; NUM_SHIPS] = [
    ShipClass::Carrier,
    ShipClass::Submarine,
    ShipClass::Submarine,
    ShipClass::Destroyer,
    ShipClass::Destroyer,
    ShipClass::Destroyer,
    ShipClass::Frigate,
    ShipClass::Frigate,
    ShipClass::Frigate,
    ShipClass::Frigate,
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 4 + 3 + 3 + 2 + 2 + 2 + 1 + 1 + 1 + 1;

/// Bumped whenever the persisted record layout changes.
pub const SAVE_FORMAT_VERSION: u32 = 2;

/// How the machine answers a human miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPolicy {
    /// Keep firing while shots land, stop on a miss or game over.
    #[default]
    KeepShootingOnHit,
    /// Exactly one shot per machine turn.
    SingleShot,
}
