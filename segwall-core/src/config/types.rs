//! Configuration type definitions

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::block::BlockType;
use crate::coord::Coord;
use crate::geometry::Layout;
use crate::traits::PinId;

/// Maximum register name length
pub const MAX_NAME_LEN: usize = 16;

/// Maximum markers (bits) per register
pub const MAX_BITS: usize = 8;

/// Maximum registers served by one router
pub const MAX_REGISTERS: usize = 4;

/// Errors that can occur while assembling a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Name longer than [`MAX_NAME_LEN`]
    NameTooLong,
    /// More than [`MAX_BITS`] markers
    TooManyMarkers,
}

/// Wall placement and appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WallConfig {
    /// Corner with the smallest coordinates
    pub origin: Coord,
    /// Cells along x
    pub width: u16,
    /// Cells along y
    pub height: u16,
    /// Cells along z
    pub thickness: u16,
    /// Block the wall is made of
    pub background: BlockType,
    /// Block used for lit segments
    pub lit: BlockType,
    /// Stroke layout
    pub layout: Layout,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            origin: Coord::ORIGIN,
            width: 8,
            height: 9,
            thickness: 1,
            background: BlockType::GOLD_BLOCK,
            lit: BlockType::DIAMOND_BLOCK,
            layout: Layout::Fixed,
        }
    }
}

impl WallConfig {
    /// Default-sized wall at `origin`
    pub fn at(origin: Coord) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }
}

/// How a marker's state is shown in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarkerStyle {
    /// Offset from the marker to the cell that shows its state
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: Coord,
    /// Block placed while the bit is on
    pub on: BlockType,
    /// Block placed while the bit is off
    pub off: BlockType,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            offset: Coord::new(0, 1, 0),
            on: BlockType::TORCH,
            off: BlockType::AIR,
        }
    }
}

impl MarkerStyle {
    /// Markers rendered in the wall's own lit/background blocks
    pub fn for_wall(wall: &WallConfig) -> Self {
        Self {
            offset: Coord::ORIGIN,
            on: wall.lit,
            off: wall.background,
        }
    }

    /// Check if rendering would clear the marker block itself
    pub fn hides_marker(&self) -> bool {
        self.offset == Coord::ORIGIN && (self.on == BlockType::AIR || self.off == BlockType::AIR)
    }

    /// Cell showing the state of the marker at `marker`
    pub fn cell(&self, marker: Coord) -> Coord {
        marker + self.offset
    }

    /// Block for a bit state
    pub fn block(&self, on: bool) -> BlockType {
        if on {
            self.on
        } else {
            self.off
        }
    }
}

/// One bit: where it is touched and which line it drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MarkerConfig {
    pub pos: Coord,
    pub line: PinId,
}

/// A register: its markers, marker style and optional wall
///
/// Markers are listed least significant bit first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterConfig {
    pub name: String<MAX_NAME_LEN>,
    pub markers: Vec<MarkerConfig, MAX_BITS>,
    /// Defaults to [`MarkerStyle::for_wall`] with a wall, else
    /// [`MarkerStyle::default`]
    pub style: Option<MarkerStyle>,
    pub wall: Option<WallConfig>,
}

impl RegisterConfig {
    /// Create an empty register config
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        let mut label = String::new();
        label.push_str(name).map_err(|_| ConfigError::NameTooLong)?;
        Ok(Self {
            name: label,
            markers: Vec::new(),
            style: None,
            wall: None,
        })
    }

    /// Append a marker as the next more significant bit
    pub fn push_marker(&mut self, pos: Coord, line: PinId) -> Result<(), ConfigError> {
        self.markers
            .push(MarkerConfig { pos, line })
            .map_err(|_| ConfigError::TooManyMarkers)
    }

    /// Marker style after defaults are applied
    pub fn resolved_style(&self) -> MarkerStyle {
        match (&self.style, &self.wall) {
            (Some(style), _) => *style,
            (None, Some(wall)) => MarkerStyle::for_wall(wall),
            (None, None) => MarkerStyle::default(),
        }
    }
}
