//! World service trait

use heapless::Vec;

use crate::block::BlockType;
use crate::coord::{Coord, Cuboid};

/// Maximum touch events returned by one poll
pub const MAX_TOUCH_BATCH: usize = 32;

/// A block touched by a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchEvent {
    /// Coordinate of the touched block
    pub pos: Coord,
    /// Face that was touched (0-5)
    pub face: i32,
    /// Entity that touched it
    pub entity_id: i32,
}

impl TouchEvent {
    /// A touch with no face or entity information
    pub const fn at(pos: Coord) -> Self {
        Self {
            pos,
            face: 0,
            entity_id: 0,
        }
    }
}

/// Touch events in the order the world reported them
pub type TouchBatch = Vec<TouchEvent, MAX_TOUCH_BATCH>;

/// Trait for the voxel world the wall is rendered into
///
/// Calls are synchronous. A failed call leaves the world in an unknown
/// state; callers re-render from their own state to recover.
pub trait World {
    /// Error type for world operations
    type Error;

    /// Place one block
    fn set_block(&mut self, pos: Coord, block: BlockType) -> Result<(), Self::Error>;

    /// Fill the inclusive box between two corners
    fn set_blocks(&mut self, from: Coord, to: Coord, block: BlockType) -> Result<(), Self::Error>;

    /// Take every pending touch event
    ///
    /// Never blocks waiting for input; returns an empty batch when nothing
    /// is pending.
    fn poll_touches(&mut self) -> Result<TouchBatch, Self::Error>;

    /// Discard every pending touch event
    fn clear_touches(&mut self) -> Result<(), Self::Error> {
        self.poll_touches().map(|_| ())
    }

    /// Move the player
    fn set_player_position(&mut self, pos: Coord) -> Result<(), Self::Error>;

    /// Post a chat message
    fn post_message(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Fill a box, using a single-block call for one cell
    fn fill(&mut self, region: Cuboid, block: BlockType) -> Result<(), Self::Error> {
        if region.is_cell() {
            self.set_block(region.start(), block)
        } else {
            self.set_blocks(region.start(), region.end(), block)
        }
    }
}
