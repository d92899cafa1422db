//! Bit markers

use crate::coord::Coord;
use crate::traits::{Level, PinId};

/// One bit of a register: a touchable cell and the line it drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitMarker {
    /// Cell that toggles the bit when touched
    pub pos: Coord,
    /// Output line mirroring the bit
    pub line: PinId,
    /// Current bit state
    pub on: bool,
}

impl BitMarker {
    /// Create a marker in the off state
    pub const fn new(pos: Coord, line: PinId) -> Self {
        Self {
            pos,
            line,
            on: false,
        }
    }

    /// Flip the bit, returning the new state
    pub fn flip(&mut self) -> bool {
        self.on = !self.on;
        self.on
    }

    /// Line level for the current state
    pub const fn level(&self) -> Level {
        Level::from_bool(self.on)
    }
}

/// Integer value of a bit sequence, least significant first
pub fn weigh(markers: &[BitMarker]) -> u8 {
    markers
        .iter()
        .enumerate()
        .filter(|(_, m)| m.on)
        .fold(0u8, |acc, (i, _)| acc | (1 << i))
}
