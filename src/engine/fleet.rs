//! Ship classes and the standard ten-ship fleet.

use alloc::vec::Vec;

use super::config::{FLEET, NUM_SHIPS};
use super::ship::Ship;

/// The four hull classes of the standard fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipClass {
    Carrier,
    Submarine,
    Destroyer,
    Frigate,
}

impl ShipClass {
    pub const ALL: [ShipClass; 4] = [
        ShipClass::Carrier,
        ShipClass::Submarine,
        ShipClass::Destroyer,
        ShipClass::Frigate,
    ];

    pub const fn length(self) -> usize {
        match self {
            ShipClass::Carrier => 4,
            ShipClass::Submarine => 3,
            ShipClass::Destroyer => 2,
            ShipClass::Frigate => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShipClass::Carrier => "Carrier",
            ShipClass::Submarine => "Submarine",
            ShipClass::Destroyer => "Destroyer",
            ShipClass::Frigate => "Frigate",
        }
    }

    pub fn from_length(length: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.length() == length)
    }

    /// Factory for one unplaced ship of this class.
    pub fn build(self) -> Ship {
        Ship::new(self.length())
    }
}

/// Ten fresh ships: one Carrier, two Submarines, three Destroyers and four
/// Frigates, largest first.
pub fn standard_fleet() -> Vec<Ship> {
    FLEET.iter().map(|class| class.build()).collect()
}

/// Whether `lengths` is exactly the standard fleet's size multiset.
pub fn is_standard_fleet<I>(lengths: I) -> bool
where
    I: IntoIterator<Item = usize>,
{
    let mut counts = [0usize; 5];
    let mut total = 0;
    for len in lengths {
        match counts.get_mut(len) {
            Some(slot) if len > 0 => *slot += 1,
            _ => return false,
        }
        total += 1;
    }
    total == NUM_SHIPS
        && ShipClass::ALL
            .iter()
            .all(|class| counts[class.length()] == FLEET.iter().filter(|c| *c == class).count())
}

/// Classes still missing from a partially built fleet, largest first.
pub fn missing_classes<I>(lengths: I) -> Vec<ShipClass>
where
    I: IntoIterator<Item = usize>,
{
    let mut placed: Vec<usize> = lengths.into_iter().collect();
    let mut missing = Vec::new();
    for class in FLEET {
        match placed.iter().position(|&len| len == class.length()) {
            Some(idx) => {
                placed.swap_remove(idx);
            }
            None => missing.push(class),
        }
    }
    missing
}
