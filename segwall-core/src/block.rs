//! Block type identifiers
//!
//! Identifiers are owned by the world service; the constants below are the
//! ones used by the bundled scenes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A block type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct BlockType(pub u16);

impl BlockType {
    pub const AIR: Self = Self(0);
    pub const STONE: Self = Self(1);
    pub const GRASS: Self = Self(2);
    pub const BEDROCK: Self = Self(7);
    pub const GOLD_BLOCK: Self = Self(41);
    pub const TORCH: Self = Self(50);
    pub const DIAMOND_BLOCK: Self = Self(57);

    /// Raw identifier sent to the world service
    pub const fn id(self) -> u16 {
        self.0
    }
}

impl From<u16> for BlockType {
    fn from(id: u16) -> Self {
        Self(id)
    }
}
