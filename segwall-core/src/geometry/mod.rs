//! Segment geometry
//!
//! Computes the seven strokes of a glyph from a wall's placement. The wall
//! lies in the x/y plane: x spans the width (positive x is the viewer's
//! left), y spans the height, z spans the thickness. Every stroke covers the
//! full thickness.

pub mod fixed;
pub mod proportional;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coord::{Coord, Cuboid};
use crate::digit::{Segment, SEGMENT_COUNT};

pub use proportional::StrokeMetrics;

/// Errors that can occur when describing a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// Width, height or thickness is zero
    EmptyWall,
}

/// Stroke layout strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Layout {
    /// Hand-placed strokes of length 4 inside an 8x9 box
    #[default]
    Fixed,
    /// Strokes scaled to the wall and centred in it
    Proportional,
}

/// Placement and size of a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallGeometry {
    origin: Coord,
    width: u16,
    height: u16,
    thickness: u16,
}

impl WallGeometry {
    /// Describe a wall, rejecting zero-sized dimensions
    pub fn new(
        origin: Coord,
        width: u16,
        height: u16,
        thickness: u16,
    ) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 || thickness == 0 {
            return Err(GeometryError::EmptyWall);
        }
        Ok(Self {
            origin,
            width,
            height,
            thickness,
        })
    }

    pub const fn origin(&self) -> Coord {
        self.origin
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn thickness(&self) -> u16 {
        self.thickness
    }

    /// Bounding volume of the wall
    pub fn bounds(&self) -> Cuboid {
        Cuboid::new(
            self.origin,
            self.origin.offset(
                self.width as i32 - 1,
                self.height as i32 - 1,
                self.thickness as i32 - 1,
            ),
        )
    }

    /// Absolute box for a stroke given in wall-local x/y cells
    ///
    /// The stroke spans the full thickness.
    fn stroke_box(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Cuboid {
        let o = self.origin;
        Cuboid::new(
            o.offset(x0, y0, 0),
            o.offset(x1, y1, self.thickness as i32 - 1),
        )
    }
}

/// One stroke of a glyph, placed in the world
///
/// Computed once when the wall is built and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentSpec {
    pub segment: Segment,
    pub start: Coord,
    pub end: Coord,
}

impl SegmentSpec {
    fn from_box(segment: Segment, b: Cuboid) -> Self {
        Self {
            segment,
            start: b.start(),
            end: b.end(),
        }
    }

    /// Volume covered by the stroke
    pub fn bounds(&self) -> Cuboid {
        Cuboid::new(self.start, self.end)
    }

    /// Check if the stroke collapsed into a single cell
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// The seven strokes of a wall, indexed by [`Segment::index`]
pub type SegmentSet = [SegmentSpec; SEGMENT_COUNT];

impl Layout {
    /// Compute the strokes for `geometry`
    pub fn segments(self, geometry: &WallGeometry) -> SegmentSet {
        match self {
            Layout::Fixed => fixed::segments(geometry),
            Layout::Proportional => proportional::segments(geometry),
        }
    }
}
